// src/services/venda_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{calculo, error::AppError},
    db::{CompraRepository, ProdutoRepository, VendaRepository},
    models::{
        compra::{LoteDisponivel, OrigemLote},
        venda::{self, ItemVendaPayload, Venda, VendaPayload},
    },
};

// Uma fatia do plano PEPS: quanto tirar de qual lote, ao custo daquele lote.
#[derive(Debug, Clone, PartialEq)]
pub struct AlocacaoPeps {
    pub lote_id: Uuid,
    pub origem: OrigemLote,
    pub quantidade: Decimal,
    pub custo_unitario: Decimal,
}

/// Planeja o consumo PEPS: lotes em ordem de entrada (data, depois criação),
/// tirando de cada um até cobrir a quantidade pedida. Devolve a quantidade
/// descoberta como erro quando os lotes não bastam.
pub fn alocar_peps(
    mut lotes: Vec<LoteDisponivel>,
    quantidade: Decimal,
) -> Result<Vec<AlocacaoPeps>, Decimal> {
    lotes.sort_by(|a, b| {
        a.data_entrada
            .cmp(&b.data_entrada)
            .then(a.created_at.cmp(&b.created_at))
    });

    let mut restante = quantidade;
    let mut plano = Vec::new();

    for lote in &lotes {
        if restante <= Decimal::ZERO {
            break;
        }
        if lote.saldo <= Decimal::ZERO {
            continue;
        }

        let retirar = if lote.saldo >= restante {
            restante
        } else {
            lote.saldo
        };

        plano.push(AlocacaoPeps {
            lote_id: lote.id,
            origem: lote.origem,
            quantidade: retirar,
            custo_unitario: lote.custo_unitario,
        });
        restante -= retirar;
    }

    if restante > Decimal::ZERO {
        return Err(restante);
    }
    Ok(plano)
}

#[derive(Clone)]
pub struct VendaService {
    venda_repo: VendaRepository,
    compra_repo: CompraRepository,
    produto_repo: ProdutoRepository,
}

impl VendaService {
    pub fn new(
        venda_repo: VendaRepository,
        compra_repo: CompraRepository,
        produto_repo: ProdutoRepository,
    ) -> Self {
        Self {
            venda_repo,
            compra_repo,
            produto_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<Venda>, AppError> {
        let mut vendas = self.venda_repo.listar().await?;
        for venda in &mut vendas {
            venda.itens_agrupados = venda::agrupar_itens(&venda.itens);
        }
        Ok(vendas)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Venda, AppError> {
        let mut venda = self
            .venda_repo
            .buscar(id)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Venda".into()))?;
        venda.itens_agrupados = venda::agrupar_itens(&venda.itens);
        Ok(venda)
    }

    // --- CRIAR (alocação PEPS) ---
    pub async fn criar<'e, E>(&self, executor: E, payload: &VendaPayload) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut venda = self.venda_repo.inserir_cabecalho(&mut *tx, payload).await?;

        self.alocar_carrinho(&mut tx, &mut venda, &payload.itens)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "💰 Venda {} registrada: {} linha(s) em {} lote(s).",
            venda.id_pedido,
            payload.itens.len(),
            venda.itens.len()
        );
        Ok(venda)
    }

    // --- ATUALIZAR ---
    // Estorna a alocação anterior (saldo dos lotes e estoque) e aloca o
    // carrinho novo do zero, tudo na mesma transação.
    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &VendaPayload,
    ) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut venda = self
            .venda_repo
            .atualizar_cabecalho(&mut *tx, id, payload)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Venda".into()))?;

        self.estornar_itens(&mut tx, id).await?;
        venda.itens.clear();

        self.alocar_carrinho(&mut tx, &mut venda, &payload.itens)
            .await?;

        tx.commit().await?;
        Ok(venda)
    }

    // --- EXCLUIR ---
    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.estornar_itens(&mut tx, id).await?;

        let excluidas = self.venda_repo.excluir(&mut *tx, id).await?;
        if excluidas == 0 {
            return Err(AppError::RecursoNaoEncontrado("Venda".into()));
        }

        tx.commit().await?;
        Ok(())
    }

    // Consome os lotes de cada linha do carrinho e grava os itens divididos.
    // Preenche os totais derivados da venda.
    async fn alocar_carrinho(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        venda: &mut Venda,
        carrinho: &[ItemVendaPayload],
    ) -> Result<(), AppError> {
        let mut custo_acumulado = Decimal::ZERO;

        for linha in carrinho {
            let produto = self
                .produto_repo
                .buscar_para_atualizacao(&mut **tx, linha.produto_id)
                .await?
                .ok_or_else(|| AppError::RecursoNaoEncontrado("Produto".into()))?;

            let mut lotes = self
                .compra_repo
                .lotes_disponiveis(&mut **tx, linha.produto_id)
                .await?;
            lotes.extend(
                self.compra_repo
                    .lotes_legados_disponiveis(&mut **tx, linha.produto_id)
                    .await?,
            );

            let disponivel: Decimal = lotes.iter().map(|l| l.saldo).sum();

            let plano = alocar_peps(lotes, linha.quantidade).map_err(|_| {
                AppError::EstoqueInsuficiente {
                    produto: produto.nome.clone(),
                    disponivel,
                    solicitado: linha.quantidade,
                }
            })?;

            for alocacao in plano {
                self.compra_repo
                    .ajustar_saldo_lote(
                        &mut **tx,
                        alocacao.origem,
                        alocacao.lote_id,
                        -alocacao.quantidade,
                    )
                    .await?;

                let item = self
                    .venda_repo
                    .inserir_item(
                        &mut **tx,
                        venda.id,
                        linha.produto_id,
                        Some(alocacao.lote_id),
                        alocacao.origem,
                        alocacao.quantidade,
                        linha.preco_unitario_venda,
                        calculo::preco_total(alocacao.quantidade, linha.preco_unitario_venda),
                        alocacao.custo_unitario,
                    )
                    .await?;

                custo_acumulado += alocacao.quantidade * alocacao.custo_unitario;
                venda.itens.push(item);
            }

            self.produto_repo
                .ajustar_estoque(&mut **tx, linha.produto_id, -linha.quantidade)
                .await?;
        }

        // Cadeia de lucro da venda, toda em common::calculo.
        venda.custo_produto_vendido = calculo::round2(custo_acumulado);
        let faturamento = calculo::faturamento(venda.preco_venda, venda.frete_pago_pelo_cliente);
        let custo_efetivo = calculo::custo_efetivo_total(
            venda.custo_produto_vendido,
            venda.custo_envio,
            venda.tarifa_plataforma,
        );
        venda.lucro_bruto = calculo::lucro_bruto(faturamento, custo_efetivo);
        venda.roi = calculo::roi(venda.lucro_bruto, custo_efetivo);

        self.venda_repo
            .atualizar_totais(
                &mut **tx,
                venda.id,
                venda.custo_produto_vendido,
                venda.lucro_bruto,
                venda.roi,
            )
            .await?;

        venda.itens_agrupados = venda::agrupar_itens(&venda.itens);
        Ok(())
    }

    // Devolve as quantidades alocadas aos lotes de origem e ao estoque.
    async fn estornar_itens(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        venda_id: Uuid,
    ) -> Result<(), AppError> {
        let itens = self.venda_repo.itens(&mut **tx, venda_id).await?;

        for item in &itens {
            if let Some(lote_id) = item.lote_id {
                self.compra_repo
                    .ajustar_saldo_lote(&mut **tx, item.origem_lote, lote_id, item.quantidade)
                    .await?;
            }

            self.produto_repo
                .ajustar_estoque(&mut **tx, item.produto_id, item.quantidade)
                .await?;
        }

        self.venda_repo.excluir_itens(&mut **tx, venda_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn lote(
        origem: OrigemLote,
        saldo: &str,
        custo: &str,
        dia: u32,
        ordem: u32,
    ) -> LoteDisponivel {
        LoteDisponivel {
            id: Uuid::new_v4(),
            origem,
            saldo: dec(saldo),
            custo_unitario: dec(custo),
            data_entrada: NaiveDate::from_ymd_opt(2024, 1, dia).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, dia, 12, 0, ordem).unwrap(),
        }
    }

    #[test]
    fn consome_um_unico_lote_quando_ele_basta() {
        let lotes = vec![lote(OrigemLote::Compra, "10", "5.00", 1, 0)];
        let plano = alocar_peps(lotes.clone(), dec("4")).unwrap();

        assert_eq!(plano.len(), 1);
        assert_eq!(plano[0].lote_id, lotes[0].id);
        assert_eq!(plano[0].quantidade, dec("4"));
        assert_eq!(plano[0].custo_unitario, dec("5.00"));
    }

    #[test]
    fn divide_entre_lotes_na_ordem_de_entrada() {
        let primeiro = lote(OrigemLote::Compra, "4", "25.00", 1, 0);
        let segundo = lote(OrigemLote::Compra, "8", "28.00", 5, 0);
        // Fora de ordem de propósito: o planejador ordena por data.
        let plano = alocar_peps(vec![segundo.clone(), primeiro.clone()], dec("10")).unwrap();

        assert_eq!(plano.len(), 2);
        assert_eq!(plano[0].lote_id, primeiro.id);
        assert_eq!(plano[0].quantidade, dec("4"));
        assert_eq!(plano[1].lote_id, segundo.id);
        assert_eq!(plano[1].quantidade, dec("6"));

        let total: Decimal = plano.iter().map(|a| a.quantidade).sum();
        assert_eq!(total, dec("10"));
    }

    #[test]
    fn lotes_do_mesmo_dia_saem_na_ordem_de_criacao() {
        let primeiro = lote(OrigemLote::SistemaAntigo, "3", "10.00", 2, 0);
        let segundo = lote(OrigemLote::Compra, "3", "12.00", 2, 30);

        let plano = alocar_peps(vec![segundo.clone(), primeiro.clone()], dec("4")).unwrap();

        assert_eq!(plano[0].lote_id, primeiro.id);
        assert_eq!(plano[0].origem, OrigemLote::SistemaAntigo);
        assert_eq!(plano[0].quantidade, dec("3"));
        assert_eq!(plano[1].lote_id, segundo.id);
        assert_eq!(plano[1].quantidade, dec("1"));
    }

    #[test]
    fn devolve_a_quantidade_descoberta_quando_nao_ha_saldo() {
        let lotes = vec![
            lote(OrigemLote::Compra, "2", "5.00", 1, 0),
            lote(OrigemLote::Compra, "3", "6.00", 2, 0),
        ];

        let faltante = alocar_peps(lotes, dec("7")).unwrap_err();
        assert_eq!(faltante, dec("2"));
    }

    #[test]
    fn ignora_lotes_zerados() {
        let vazio = lote(OrigemLote::Compra, "0", "4.00", 1, 0);
        let cheio = lote(OrigemLote::Compra, "5", "6.00", 2, 0);

        let plano = alocar_peps(vec![vazio, cheio.clone()], dec("5")).unwrap();
        assert_eq!(plano.len(), 1);
        assert_eq!(plano[0].lote_id, cheio.id);
    }

    #[test]
    fn custo_do_plano_segue_o_custo_de_cada_lote() {
        let lotes = vec![
            lote(OrigemLote::Compra, "4", "25.00", 1, 0),
            lote(OrigemLote::Compra, "6", "28.00", 3, 0),
        ];

        let plano = alocar_peps(lotes, dec("10")).unwrap();
        let custo_total: Decimal = plano
            .iter()
            .map(|a| a.quantidade * a.custo_unitario)
            .sum();

        // 4 x 25 + 6 x 28 = 268
        assert_eq!(custo_total, dec("268"));
    }
}
