//! Cuenta contable and fund DTOs

use compras_ledger::{CuentaFund, FundDirection, FundStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Cuenta contable with its fund, as listed for the budget view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuentaContableResponse {
    pub id: i64,
    pub ccontable: String,
    pub desc_contable: String,
    pub partida: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fondo: Decimal,
    pub estado: FundStatus,
    pub centro_costo_nombre: String,
}

impl From<CuentaFund> for CuentaContableResponse {
    fn from(c: CuentaFund) -> Self {
        let cuenta = c.listing.cuenta;
        Self {
            id: cuenta.id,
            ccontable: cuenta.ccontable,
            desc_contable: cuenta.desc_contable,
            partida: cuenta.partida,
            fondo: c.fondo,
            estado: c.estado,
            centro_costo_nombre: c.listing.centro_costo_nombre,
        }
    }
}

/// Assign a partida's fund
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFondoRequest {
    #[validate(custom(function = "non_negative"))]
    pub fondo: Decimal,
}

/// Adjustment kind as sent by the budget view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoAjuste {
    Agregar,
    Quitar,
}

impl TipoAjuste {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoAjuste::Agregar => "agregar",
            TipoAjuste::Quitar => "quitar",
        }
    }
}

impl From<TipoAjuste> for FundDirection {
    fn from(tipo: TipoAjuste) -> Self {
        match tipo {
            TipoAjuste::Agregar => FundDirection::Increase,
            TipoAjuste::Quitar => FundDirection::Decrease,
        }
    }
}

/// Add to or remove from a partida's fund
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AjusteFondoRequest {
    #[validate(custom(function = "non_negative"))]
    pub monto: Decimal,
    pub tipo: TipoAjuste,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FondoResponse {
    pub partida: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fondo: Decimal,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_update_fondo_accepts_json_number() {
        let request: UpdateFondoRequest = serde_json::from_str(r#"{"fondo": 500.25}"#).unwrap();
        assert_eq!(request.fondo, dec!(500.25));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_fondo_fails_validation() {
        let request = UpdateFondoRequest { fondo: dec!(-1) };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ajuste_tipo_wire_names() {
        let request: AjusteFondoRequest =
            serde_json::from_str(r#"{"monto": 100, "tipo": "quitar"}"#).unwrap();
        assert_eq!(request.tipo, TipoAjuste::Quitar);
        assert_eq!(FundDirection::from(request.tipo), FundDirection::Decrease);
        assert!(serde_json::from_str::<AjusteFondoRequest>(r#"{"monto": 1, "tipo": "sumar"}"#).is_err());
    }

    #[test]
    fn test_fondo_serializes_as_number() {
        let json = serde_json::to_value(FondoResponse { partida: "76".into(), fondo: dec!(500) }).unwrap();
        assert_eq!(json["fondo"], serde_json::json!(500.0));
    }
}
