//! Reference data shaped for the order form

use std::sync::Arc;

use compras_db::{DbArticulo, DbCuentaContableListing, DbPartidaTreeRow, DbProveedor, Database};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::ledger::FundStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuentaNode {
    pub ccontable: String,
    pub desc_contable: String,
    pub partida: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CentroCostoNode {
    pub ccosto: String,
    pub desc_cc: String,
    pub cuentas: Vec<CuentaNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GerenciaNode {
    pub gerencia: String,
    pub centros_costo: Vec<CentroCostoNode>,
}

/// Purchase category as a dropdown option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoriaOption {
    pub id: i64,
    pub value: String,
    pub label: String,
}

/// Cuenta contable with its fund and budget state
#[derive(Debug, Clone)]
pub struct CuentaFund {
    pub listing: DbCuentaContableListing,
    pub fondo: Decimal,
    pub estado: FundStatus,
}

/// Read-only access to the reference tables
#[derive(Clone)]
pub struct ReferenceData {
    db: Arc<Database>,
}

impl ReferenceData {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Gerencia -> centro de costo -> cuenta tree
    pub async fn partida_tree(&self) -> Result<Vec<GerenciaNode>> {
        let rows = self.db.catalog_repo().partida_tree_rows().await?;
        Ok(fold_tree(rows))
    }

    pub async fn articulos(&self) -> Result<Vec<DbArticulo>> {
        Ok(self.db.catalog_repo().articulos().await?)
    }

    pub async fn categorias(&self) -> Result<Vec<CategoriaOption>> {
        let categorias = self.db.catalog_repo().categorias().await?;
        Ok(categorias
            .into_iter()
            .map(|c| CategoriaOption {
                id: c.id,
                value: c.nombre.clone(),
                label: c.descripcion.filter(|d| !d.trim().is_empty()).unwrap_or(c.nombre),
            })
            .collect())
    }

    pub async fn proveedores(&self) -> Result<Vec<DbProveedor>> {
        Ok(self.db.catalog_repo().proveedores().await?)
    }

    pub async fn cuentas(&self) -> Result<Vec<CuentaFund>> {
        let cuentas = self.db.cuenta_contable_repo().list_with_centro().await?;
        Ok(cuentas
            .into_iter()
            .map(|listing| {
                let fondo = listing.cuenta.fondo();
                CuentaFund { listing, fondo, estado: FundStatus::classify(fondo) }
            })
            .collect())
    }
}

/// Fold the ordered join into nested nodes. Rows arrive grouped by gerencia
/// then centro, so a change of id starts a new node.
fn fold_tree(rows: Vec<DbPartidaTreeRow>) -> Vec<GerenciaNode> {
    let mut tree: Vec<GerenciaNode> = Vec::new();
    let mut current_gerencia: Option<i64> = None;
    let mut current_centro: Option<i64> = None;

    for row in rows {
        if current_gerencia != Some(row.gerencia_id) {
            tree.push(GerenciaNode { gerencia: row.gerencia.clone(), centros_costo: Vec::new() });
            current_gerencia = Some(row.gerencia_id);
            current_centro = None;
        }
        let Some(gerencia) = tree.last_mut() else { continue };

        let (Some(centro_id), Some(ccosto)) = (row.centro_costo_id, row.ccosto) else {
            continue;
        };
        if current_centro != Some(centro_id) {
            gerencia.centros_costo.push(CentroCostoNode {
                ccosto,
                desc_cc: row.desc_cc.unwrap_or_default(),
                cuentas: Vec::new(),
            });
            current_centro = Some(centro_id);
        }
        let Some(centro) = gerencia.centros_costo.last_mut() else { continue };

        if let Some(partida) = row.partida {
            centro.cuentas.push(CuentaNode {
                ccontable: row.ccontable.unwrap_or_default(),
                desc_contable: row.desc_contable.unwrap_or_default(),
                partida,
            });
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(g: i64, c: Option<i64>, partida: Option<&str>) -> DbPartidaTreeRow {
        DbPartidaTreeRow {
            gerencia_id: g,
            gerencia: format!("GERENCIA {}", g),
            centro_costo_id: c,
            ccosto: c.map(|c| (c * 100).to_string()),
            desc_cc: c.map(|c| format!("CENTRO {}", c)),
            ccontable: partida.map(|p| format!("63{}", p)),
            desc_contable: partida.map(|p| format!("CUENTA {}", p)),
            partida: partida.map(str::to_string),
        }
    }

    #[test]
    fn test_fold_tree_groups_levels() {
        let tree = fold_tree(vec![
            row(1, Some(1), Some("76")),
            row(1, Some(1), Some("78")),
            row(1, Some(2), Some("119")),
            row(2, None, None),
            row(3, Some(3), None),
        ]);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].centros_costo.len(), 2);
        assert_eq!(tree[0].centros_costo[0].cuentas.len(), 2);
        assert_eq!(tree[0].centros_costo[1].ccosto, "200");
        assert_eq!(tree[0].centros_costo[1].cuentas[0].partida, "119");
        assert!(tree[1].centros_costo.is_empty());
        assert!(tree[2].centros_costo[0].cuentas.is_empty());
    }

    #[test]
    fn test_tree_serializes_with_wire_names() {
        let tree = fold_tree(vec![row(1, Some(1), Some("76"))]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "gerencia": "GERENCIA 1",
                "centrosCosto": [{
                    "ccosto": "100",
                    "desc_cc": "CENTRO 1",
                    "cuentas": [{ "ccontable": "6376", "desc_contable": "CUENTA 76", "partida": "76" }]
                }]
            }])
        );
    }

    #[tokio::test]
    async fn test_seeded_reference_data() {
        let reference = ReferenceData::new(Arc::new(Database::in_memory().await.unwrap()));

        let tree = reference.partida_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].gerencia, "ADMINISTRACION Y FINANZAS");
        assert_eq!(tree[0].centros_costo[0].cuentas.len(), 28);

        let cuentas = reference.cuentas().await.unwrap();
        assert!(cuentas.iter().all(|c| c.estado == FundStatus::SinPresupuesto));
    }
}
