// src/common/datas.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

// O sistema antigo envia datas como "YYYY-MM-DDT00:00:00" (às vezes com "Z")
// para driblar deriva de fuso; o formato novo é só "YYYY-MM-DD". Aceitamos
// os dois e descartamos a parte de hora.
pub fn desserializar_data_flexivel<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let bruto = String::deserialize(deserializer)?;
    let so_data = bruto.get(..10).unwrap_or(&bruto);
    NaiveDate::parse_from_str(so_data, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "desserializar_data_flexivel")]
        data: NaiveDate,
    }

    #[test]
    fn aceita_data_simples_e_formato_legado() {
        let esperado = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let p: Payload = serde_json::from_str(r#"{"data": "2024-03-15"}"#).unwrap();
        assert_eq!(p.data, esperado);

        let p: Payload = serde_json::from_str(r#"{"data": "2024-03-15T00:00:00"}"#).unwrap();
        assert_eq!(p.data, esperado);

        let p: Payload = serde_json::from_str(r#"{"data": "2024-03-15T00:00:00Z"}"#).unwrap();
        assert_eq!(p.data, esperado);
    }

    #[test]
    fn rejeita_data_invalida() {
        assert!(serde_json::from_str::<Payload>(r#"{"data": "15/03/2024"}"#).is_err());
    }
}
