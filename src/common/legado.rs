// src/common/legado.rs

//! Fronteira com o sistema antigo de entradas.
//!
//! Os gatilhos do sistema antigo sinalizam falhas com mensagens de texto
//! livre em vez de códigos. Enquanto a migração não termina, este módulo
//! reconhece os padrões conhecidos e os converte nos mesmos erros
//! estruturados do resto da aplicação. Nenhum outro ponto do código casa
//! substrings de mensagem de erro.

use rust_decimal::Decimal;

use crate::common::error::AppError;

pub const MENSAGEM_ERRO_INESPERADO: &str = "Ocorreu um erro inesperado.";

// Mensagens maiores que isso não são mostradas ao usuário.
const LIMITE_MENSAGEM: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperacaoLote {
    Edicao,
    Exclusao,
}

/// Converte uma mensagem de erro do sistema antigo no erro estruturado
/// equivalente. `id_pedido` é o identificador que o usuário submeteu, usado
/// no erro de pedido duplicado.
pub fn classificar_erro_legado(
    mensagem: &str,
    id_pedido: &str,
    operacao: OperacaoLote,
) -> AppError {
    if mensagem.contains("parcialmente consumido") {
        let saldo = extrair_numero(mensagem, "Saldo atual");
        let quantidade = extrair_numero(mensagem, "Quantidade original");
        if let (Some(saldo_atual), Some(quantidade_antiga)) = (saldo, quantidade) {
            return match operacao {
                OperacaoLote::Edicao => AppError::LoteConsumidoEdicao {
                    saldo_atual,
                    quantidade_antiga,
                },
                OperacaoLote::Exclusao => AppError::LoteConsumidoExclusao {
                    saldo_atual,
                    quantidade_antiga,
                },
            };
        }
    }

    if mensagem.contains("Já existe uma compra com este ID do pedido") {
        return AppError::PedidoDuplicado {
            id_pedido: id_pedido.to_string(),
        };
    }

    if mensagem.is_empty() || mensagem.len() > LIMITE_MENSAGEM {
        return AppError::ErroLegado(MENSAGEM_ERRO_INESPERADO.to_string());
    }
    AppError::ErroLegado(mensagem.to_string())
}

// Extrai o número que segue "<rotulo>: " na mensagem, tolerando o ponto
// final da frase ("Saldo atual: 7." -> 7).
fn extrair_numero(mensagem: &str, rotulo: &str) -> Option<Decimal> {
    let inicio = mensagem.find(rotulo)? + rotulo.len();
    let resto = mensagem[inicio..].trim_start_matches(':').trim_start();

    let fim = resto
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(resto.len());
    let bruto = resto[..fim].trim_end_matches('.');

    bruto.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn reconhece_lote_parcialmente_consumido_na_edicao() {
        let mensagem =
            "Não é possível alterar: lote parcialmente consumido. Saldo atual: 7. Quantidade original: 10.";

        match classificar_erro_legado(mensagem, "PED-1", OperacaoLote::Edicao) {
            AppError::LoteConsumidoEdicao {
                saldo_atual,
                quantidade_antiga,
            } => {
                assert_eq!(saldo_atual, dec("7"));
                assert_eq!(quantidade_antiga, dec("10"));
            }
            outro => panic!("esperava LoteConsumidoEdicao, veio {:?}", outro),
        }
    }

    #[test]
    fn reconhece_lote_parcialmente_consumido_na_exclusao() {
        let mensagem =
            "Não é possível excluir: lote parcialmente consumido. Saldo atual: 2.50. Quantidade original: 5.";

        match classificar_erro_legado(mensagem, "PED-1", OperacaoLote::Exclusao) {
            AppError::LoteConsumidoExclusao {
                saldo_atual,
                quantidade_antiga,
            } => {
                assert_eq!(saldo_atual, dec("2.50"));
                assert_eq!(quantidade_antiga, dec("5"));
            }
            outro => panic!("esperava LoteConsumidoExclusao, veio {:?}", outro),
        }
    }

    #[test]
    fn reconhece_pedido_duplicado_com_o_id_submetido() {
        let mensagem = "Já existe uma compra com este ID do pedido";

        match classificar_erro_legado(mensagem, "AMZ-404-77", OperacaoLote::Edicao) {
            AppError::PedidoDuplicado { id_pedido } => assert_eq!(id_pedido, "AMZ-404-77"),
            outro => panic!("esperava PedidoDuplicado, veio {:?}", outro),
        }
    }

    #[test]
    fn mensagem_desconhecida_curta_passa_adiante() {
        match classificar_erro_legado("Falha ao gravar entrada.", "X", OperacaoLote::Edicao) {
            AppError::ErroLegado(mensagem) => assert_eq!(mensagem, "Falha ao gravar entrada."),
            outro => panic!("esperava ErroLegado, veio {:?}", outro),
        }
    }

    #[test]
    fn mensagem_longa_vira_erro_inesperado() {
        let mensagem = "x".repeat(500);
        match classificar_erro_legado(&mensagem, "X", OperacaoLote::Exclusao) {
            AppError::ErroLegado(m) => assert_eq!(m, MENSAGEM_ERRO_INESPERADO),
            outro => panic!("esperava ErroLegado, veio {:?}", outro),
        }
    }

    #[test]
    fn consumido_sem_numeros_cai_no_generico() {
        match classificar_erro_legado(
            "lote parcialmente consumido",
            "X",
            OperacaoLote::Edicao,
        ) {
            AppError::ErroLegado(_) => {}
            outro => panic!("esperava ErroLegado, veio {:?}", outro),
        }
    }
}
