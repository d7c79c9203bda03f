// src/services/dashboard_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{calculo, error::AppError},
    db::{DashboardRepository, DespesaRepository},
    models::dashboard::{CrescimentoMensal, MetricasMes, PontoGraficoVendas, ResumoDashboard, TopProduto},
};

/// Primeiro e último dia do mês.
pub fn limites_do_mes(ano: i32, mes: u32) -> Option<(NaiveDate, NaiveDate)> {
    let inicio = NaiveDate::from_ymd_opt(ano, mes, 1)?;
    let (ano_seguinte, mes_seguinte) = mes_anterior_ou_seguinte(ano, mes, 1);
    let fim = NaiveDate::from_ymd_opt(ano_seguinte, mes_seguinte, 1)?.pred_opt()?;
    Some((inicio, fim))
}

// delta = 1 para o mês seguinte, -1 para o anterior.
fn mes_anterior_ou_seguinte(ano: i32, mes: u32, delta: i32) -> (i32, u32) {
    let total = ano * 12 + (mes as i32 - 1) + delta;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
    despesa_repo: DespesaRepository,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository, despesa_repo: DespesaRepository) -> Self {
        Self {
            dashboard_repo,
            despesa_repo,
        }
    }

    // Resumo do mês pedido (ou do corrente) com o comparativo do anterior.
    pub async fn resumo(
        &self,
        mes: Option<u32>,
        ano: Option<i32>,
    ) -> Result<ResumoDashboard, AppError> {
        let hoje = Utc::now().date_naive();
        let mes = mes.unwrap_or_else(|| hoje.month());
        let ano = ano.unwrap_or_else(|| hoje.year());

        let (inicio_atual, fim_atual) = limites_do_mes(ano, mes)
            .ok_or_else(|| anyhow::anyhow!("Mês inválido: {}/{}", mes, ano))?;

        let (ano_anterior, mes_anterior) = mes_anterior_ou_seguinte(ano, mes, -1);
        let (inicio_anterior, fim_anterior) = limites_do_mes(ano_anterior, mes_anterior)
            .ok_or_else(|| anyhow::anyhow!("Mês inválido: {}/{}", mes_anterior, ano_anterior))?;

        let atual = self.metricas_do_periodo(inicio_atual, fim_atual).await?;
        let anterior = self
            .metricas_do_periodo(inicio_anterior, fim_anterior)
            .await?;

        let crescimento = CrescimentoMensal {
            faturamento: calculo::crescimento_percentual(
                atual.faturamento_total,
                anterior.faturamento_total,
            ),
            lucro_liquido: calculo::crescimento_percentual(
                atual.lucro_liquido,
                anterior.lucro_liquido,
            ),
        };

        Ok(ResumoDashboard {
            atual,
            anterior,
            crescimento,
        })
    }

    pub async fn grafico_vendas(&self) -> Result<Vec<PontoGraficoVendas>, AppError> {
        self.dashboard_repo.grafico_vendas_30_dias().await
    }

    pub async fn top_produtos(&self) -> Result<Vec<TopProduto>, AppError> {
        self.dashboard_repo.top_produtos().await
    }

    // Agregados crus do banco -> cadeia de lucro em common::calculo.
    async fn metricas_do_periodo(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<MetricasMes, AppError> {
        let totais = self.dashboard_repo.totais_vendas(inicio, fim).await?;
        let despesas_operacionais = self.despesa_repo.total_periodo(inicio, fim).await?;

        let faturamento_total = totais.faturamento.unwrap_or(Decimal::ZERO);
        let custo_produto_vendido = totais.custo_produto.unwrap_or(Decimal::ZERO);
        let custo_efetivo_total = calculo::custo_efetivo_total(
            custo_produto_vendido,
            totais.custo_envio.unwrap_or(Decimal::ZERO),
            totais.tarifas.unwrap_or(Decimal::ZERO),
        );
        let lucro_bruto = calculo::lucro_bruto(faturamento_total, custo_efetivo_total);
        let lucro_liquido = calculo::lucro_liquido(lucro_bruto, despesas_operacionais);
        let roi = calculo::roi(lucro_liquido, custo_efetivo_total);

        Ok(MetricasMes {
            faturamento_total,
            custo_produto_vendido,
            custo_efetivo_total,
            lucro_bruto,
            despesas_operacionais,
            lucro_liquido,
            roi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limites_de_um_mes_comum() {
        let (inicio, fim) = limites_do_mes(2024, 3).unwrap();
        assert_eq!(inicio, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(fim, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn fevereiro_bissexto() {
        let (_, fim) = limites_do_mes(2024, 2).unwrap();
        assert_eq!(fim, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn dezembro_vira_o_ano() {
        let (inicio, fim) = limites_do_mes(2023, 12).unwrap();
        assert_eq!(inicio, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(fim, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn mes_anterior_de_janeiro_e_dezembro() {
        assert_eq!(mes_anterior_ou_seguinte(2024, 1, -1), (2023, 12));
        assert_eq!(mes_anterior_ou_seguinte(2024, 6, -1), (2024, 5));
        assert_eq!(mes_anterior_ou_seguinte(2023, 12, 1), (2024, 1));
    }
}
