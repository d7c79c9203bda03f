// src/common/calculo.rs

//! Módulo único de cálculo financeiro.
//!
//! Todas as telas e relatórios derivam totais daqui: linha do carrinho,
//! cadeia de lucro da venda e indicadores do dashboard usam as mesmas
//! funções, para que nenhum componente reimplemente (e divirja de) uma
//! fórmula.

use rust_decimal::{Decimal, RoundingStrategy};

// Arredondamento "meio longe do zero" nos centésimos: 2.345 -> 2.35.
pub fn round2(valor: Decimal) -> Decimal {
    valor.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round1(valor: Decimal) -> Decimal {
    valor.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Total da linha: quantidade x preço unitário, em centavos exatos.
pub fn preco_total(quantidade: Decimal, preco_unitario: Decimal) -> Decimal {
    round2(quantidade * preco_unitario)
}

/// Inversa do total da linha. Quantidade zero (ou negativa) devolve 0.
pub fn preco_unitario(preco_total: Decimal, quantidade: Decimal) -> Decimal {
    if quantidade <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round2(preco_total / quantidade)
}

pub fn faturamento(preco_venda: Decimal, frete_pago_pelo_cliente: Decimal) -> Decimal {
    preco_venda + frete_pago_pelo_cliente
}

pub fn custo_efetivo_total(
    custo_produto_vendido: Decimal,
    custo_envio: Decimal,
    tarifa_plataforma: Decimal,
) -> Decimal {
    custo_produto_vendido + custo_envio + tarifa_plataforma
}

pub fn lucro_bruto(faturamento: Decimal, custo_efetivo_total: Decimal) -> Decimal {
    faturamento - custo_efetivo_total
}

pub fn lucro_liquido(lucro_bruto: Decimal, despesas_operacionais: Decimal) -> Decimal {
    lucro_bruto - despesas_operacionais
}

/// ROI em porcentagem: lucro / custo efetivo x 100.
/// Custo efetivo zero devolve 0 (nunca divide).
pub fn roi(lucro: Decimal, custo_efetivo_total: Decimal) -> Decimal {
    if custo_efetivo_total == Decimal::ZERO {
        return Decimal::ZERO;
    }
    round2(lucro / custo_efetivo_total * Decimal::from(100))
}

/// Crescimento percentual contra o mês anterior, em 1 casa decimal.
/// Base zero devolve 0.
pub fn crescimento_percentual(atual: Decimal, anterior: Decimal) -> Decimal {
    if anterior == Decimal::ZERO {
        return Decimal::ZERO;
    }
    round1((atual - anterior) / anterior * Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn round2_meio_longe_do_zero() {
        assert_eq!(round2(dec("2.345")), dec("2.35"));
        assert_eq!(round2(dec("2.344")), dec("2.34"));
        assert_eq!(round2(dec("-2.345")), dec("-2.35"));
    }

    #[test]
    fn preco_total_e_inversa() {
        assert_eq!(preco_total(dec("3"), dec("19.99")), dec("59.97"));
        assert_eq!(preco_unitario(dec("59.97"), dec("3")), dec("19.99"));

        // Divisão que não fecha exata arredonda nos centésimos.
        assert_eq!(preco_unitario(dec("10"), dec("3")), dec("3.33"));
        assert_eq!(preco_total(dec("3"), dec("3.335")), dec("10.01"));
    }

    #[test]
    fn preco_unitario_com_quantidade_zero_devolve_zero() {
        assert_eq!(preco_unitario(dec("59.97"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(preco_unitario(dec("59.97"), dec("-1")), Decimal::ZERO);
    }

    #[test]
    fn cadeia_de_lucro() {
        let fat = faturamento(dec("4500"), dec("400"));
        assert_eq!(fat, dec("4900"));

        let custo = custo_efetivo_total(dec("2800"), dec("250"), dec("150"));
        assert_eq!(custo, dec("3200"));

        let bruto = lucro_bruto(fat, custo);
        assert_eq!(bruto, dec("1700"));

        let liquido = lucro_liquido(bruto, dec("500"));
        assert_eq!(liquido, dec("1200"));

        assert_eq!(roi(liquido, custo), dec("37.50"));
    }

    #[test]
    fn roi_com_custo_zero_devolve_zero() {
        assert_eq!(roi(dec("1200"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(roi(dec("100"), dec("80")), dec("125.00"));
    }

    #[test]
    fn crescimento_contra_mes_anterior() {
        // 4900 contra base 4500 -> 8.888...% -> 8.9 em 1 casa.
        assert_eq!(crescimento_percentual(dec("4900"), dec("4500")), dec("8.9"));
        assert_eq!(crescimento_percentual(dec("4500"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(crescimento_percentual(dec("4000"), dec("4500")), dec("-11.1"));
    }
}
