//! Reference catalog DTOs

use compras_db::{DbArticulo, DbProveedor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticuloResponse {
    pub id: i64,
    pub codigo_articulo: String,
    pub desc_articulo: String,
    pub familia_material: String,
    pub unidad_medida: String,
}

impl From<DbArticulo> for ArticuloResponse {
    fn from(a: DbArticulo) -> Self {
        Self {
            id: a.id,
            codigo_articulo: a.codigo_articulo,
            desc_articulo: a.desc_articulo,
            familia_material: a.familia_material,
            unidad_medida: a.unidad_medida,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveedorResponse {
    pub id: i64,
    pub cod_proveedor: String,
    pub razon_social: String,
}

impl From<DbProveedor> for ProveedorResponse {
    fn from(p: DbProveedor) -> Self {
        Self {
            id: p.id,
            cod_proveedor: p.codigo,
            razon_social: p.razon_social,
        }
    }
}
