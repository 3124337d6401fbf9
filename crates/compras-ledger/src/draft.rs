//! Order drafts and their validation.
//!
//! An [`OrderDraft`] is exactly what the client posted. [`OrderDraft::validate`]
//! is a pure function that either yields a [`ValidatedOrder`] with every
//! identifier reduced to its code, or the complete set of field errors.

use std::fmt;
use std::str::FromStr;

use compras_db::money::to_cents;
use compras_db::NewOrdenCompra;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::FieldErrors;

/// A code/label pair selected from a reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLabel {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A reference selection as sent by the client.
///
/// Structured pairs are used as-is. Legacy clients send the dropdown's
/// display text instead (`"354 - ARTICULOS DE LIMPIEZA"`), which is reduced
/// to its code during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Coded(CodeLabel),
    Display(String),
}

impl Selection {
    pub fn coded(code: impl Into<String>, label: impl Into<String>) -> Self {
        Selection::Coded(CodeLabel { code: code.into(), label: Some(label.into()) })
    }

    pub fn display(text: impl Into<String>) -> Self {
        Selection::Display(text.into())
    }

    /// Raw code: the pair's code, or the trimmed display text
    fn raw(&self) -> &str {
        match self {
            Selection::Coded(pair) => pair.code.trim(),
            Selection::Display(text) => text.trim(),
        }
    }
}

/// An amount as sent by the client: JSON number or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Option<Decimal> {
        match self {
            AmountInput::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            // Thousands separators come from the form's money formatting
            AmountInput::Text(s) => Decimal::from_str(&strip_grouping(s.trim())?).ok(),
        }
    }
}

/// Remove thousands separators. Commas must sit between groups of three
/// digits (`1,200.50`); anywhere else the text is not an amount.
fn strip_grouping(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let digits = integer.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(integer);
    let mut groups = digits.split(',');
    let all_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());

    let lead = groups.next()?;
    if !(1..=3).contains(&lead.len()) || !all_digits(lead) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && all_digits(g)) {
        return None;
    }

    Some(text.replace(',', ""))
}

impl From<&str> for AmountInput {
    fn from(s: &str) -> Self {
        AmountInput::Text(s.to_string())
    }
}

/// Accepted currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneda {
    Soles,
    Dolares,
}

impl Moneda {
    pub fn as_str(&self) -> &'static str {
        match self {
            Moneda::Soles => "SOLES",
            Moneda::Dolares => "DOLARES",
        }
    }
}

/// A currency outside [`Moneda`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown moneda: {0}")]
pub struct UnknownMoneda(pub String);

impl FromStr for Moneda {
    type Err = UnknownMoneda;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOLES" | "PEN" => Ok(Moneda::Soles),
            "DOLARES" | "USD" => Ok(Moneda::Dolares),
            _ => Err(UnknownMoneda(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Moneda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase order as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    pub idx: Option<i64>,
    #[serde(default)]
    pub oc: Option<i64>,
    #[serde(default)]
    pub importe: Option<AmountInput>,
    #[serde(default)]
    pub moneda: Option<String>,
    #[serde(default)]
    pub categoria: Option<Selection>,
    #[serde(default)]
    pub proveedor: Option<Selection>,
    #[serde(default)]
    pub solicitante: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub articulo: Option<Selection>,
    #[serde(default)]
    pub gerencia: Option<Selection>,
    #[serde(default)]
    pub centro_costo: Option<Selection>,
    #[serde(default)]
    pub partida: Option<Selection>,
    /// Client's view of budget sufficiency. Informational only: the
    /// persisted flag is decided by the server-side budget check.
    #[serde(default)]
    pub presupuesto: Option<bool>,
}

/// A draft that passed validation, with identifiers reduced to codes
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub idx: Option<i64>,
    pub oc: Option<i64>,
    pub importe: Decimal,
    pub importe_cents: i64,
    pub moneda: Moneda,
    pub categoria: String,
    pub proveedor: Option<String>,
    pub solicitante: String,
    pub descripcion: String,
    pub articulo: String,
    pub gerencia: String,
    pub centro_costo: i64,
    pub partida: i64,
}

impl ValidatedOrder {
    /// Partida code as stored on the cuenta contable
    pub fn partida_code(&self) -> String {
        self.partida.to_string()
    }

    /// Row to insert once the budget check passed
    pub fn to_new_row(&self) -> NewOrdenCompra {
        NewOrdenCompra {
            idx: self.idx,
            oc: self.oc,
            importe_cents: self.importe_cents,
            moneda: self.moneda.as_str().to_string(),
            categoria: self.categoria.clone(),
            proveedor: self.proveedor.clone(),
            solicitante: self.solicitante.clone(),
            descripcion: self.descripcion.clone(),
            articulo: self.articulo.clone(),
            gerencia: self.gerencia.clone(),
            centro_costo: self.centro_costo,
            partida: self.partida,
            presupuesto: true,
        }
    }
}

impl OrderDraft {
    /// Validate and normalize. All problems are reported at once.
    pub fn validate(&self) -> Result<ValidatedOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        let importe = match &self.importe {
            None => {
                errors.add("importe", "importe is required");
                None
            }
            Some(raw) => match raw.parse() {
                None => {
                    errors.add("importe", "importe must be a decimal number");
                    None
                }
                Some(amount) if amount <= Decimal::ZERO => {
                    errors.add("importe", "importe must be greater than zero");
                    None
                }
                Some(amount) => match to_cents(amount) {
                    Ok(cents) => Some((amount, cents)),
                    Err(_) => {
                        errors.add("importe", "importe must fit decimal(12,2)");
                        None
                    }
                },
            },
        };

        let moneda = match required_text(&self.moneda) {
            None => {
                errors.add("moneda", "moneda is required");
                None
            }
            Some(text) => match text.parse::<Moneda>() {
                Ok(moneda) => Some(moneda),
                Err(_) => {
                    errors.add("moneda", "moneda must be SOLES or DOLARES");
                    None
                }
            },
        };

        let categoria = required_selection(&self.categoria, "categoria", &mut errors);
        let articulo = required_selection(&self.articulo, "articulo", &mut errors);
        let solicitante = required_field(&self.solicitante, "solicitante", &mut errors);
        let descripcion = required_field(&self.descripcion, "descripcion", &mut errors);

        let gerencia = match self.gerencia.as_ref().map(gerencia_name) {
            Some(Some(name)) => Some(name),
            _ => {
                errors.add("gerencia", "gerencia is required");
                None
            }
        };

        let centro_costo = required_code(&self.centro_costo, "centroCosto", &mut errors);
        let partida = required_code(&self.partida, "partida", &mut errors);

        let proveedor = self
            .proveedor
            .as_ref()
            .map(|p| p.raw().to_string())
            .filter(|p| !p.is_empty());

        // 0 is what the form sends when no external identifier was typed
        let idx = self.idx.filter(|&i| i != 0);

        if !errors.is_empty() {
            return Err(errors);
        }

        match (importe, moneda, categoria, articulo, solicitante, descripcion, gerencia, centro_costo, partida) {
            (
                Some((importe, importe_cents)),
                Some(moneda),
                Some(categoria),
                Some(articulo),
                Some(solicitante),
                Some(descripcion),
                Some(gerencia),
                Some(centro_costo),
                Some(partida),
            ) => Ok(ValidatedOrder {
                idx,
                oc: self.oc,
                importe,
                importe_cents,
                moneda,
                categoria,
                proveedor,
                solicitante,
                descripcion,
                articulo,
                gerencia,
                centro_costo,
                partida,
            }),
            _ => Err(errors),
        }
    }
}

/// Strip a leading numeric prefix: `"01 FINANZAS"` becomes `"FINANZAS"`
pub fn strip_numeric_prefix(text: &str) -> &str {
    text.trim_start()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
}

/// Leading integer token: `"354 - ARTICULOS DE LIMPIEZA"` becomes `354`
pub fn leading_code(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn gerencia_name(selection: &Selection) -> Option<String> {
    let name = match selection {
        Selection::Coded(pair) => pair.code.trim(),
        Selection::Display(text) => strip_numeric_prefix(text),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn selection_code(selection: &Selection) -> Option<i64> {
    match selection {
        Selection::Coded(pair) => pair.code.trim().parse().ok(),
        Selection::Display(text) => leading_code(text),
    }
}

fn required_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required_field(value: &Option<String>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let text = required_text(value).map(str::to_string);
    if text.is_none() {
        errors.add(field, format!("{} is required", field));
    }
    text
}

fn required_selection(value: &Option<Selection>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let text = value
        .as_ref()
        .map(|s| s.raw().to_string())
        .filter(|s| !s.is_empty());
    if text.is_none() {
        errors.add(field, format!("{} is required", field));
    }
    text
}

fn required_code(value: &Option<Selection>, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    match value {
        Some(selection) if !selection.raw().is_empty() => {
            let code = selection_code(selection);
            if code.is_none() {
                errors.add(field, format!("{} must start with a numeric code", field));
            }
            code
        }
        _ => {
            errors.add(field, format!("{} is required", field));
            None
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
