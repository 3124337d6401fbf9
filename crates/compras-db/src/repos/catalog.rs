//! Read-only reference data: the partida tree and the flat catalogs

use sqlx::SqlitePool;

use crate::{DbArticulo, DbCategoriaCompra, DbPartidaTreeRow, DbProveedor, DbResult};

pub struct CatalogRepo {
    pool: SqlitePool,
}

impl CatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Flattened gerencia -> centro de costo -> cuenta rows, ordered so that
    /// each parent's children are contiguous.
    pub async fn partida_tree_rows(&self) -> DbResult<Vec<DbPartidaTreeRow>> {
        let rows = sqlx::query_as::<_, DbPartidaTreeRow>(
            r#"
            SELECT g.id AS gerencia_id, g.nombre AS gerencia,
                   cc.id AS centro_costo_id, cc.ccosto, cc.desc_cc,
                   c.ccontable, c.desc_contable, c.partida
            FROM gerencias g
            LEFT JOIN centros_costos cc ON cc.gerencia_id = g.id
            LEFT JOIN cuenta_contables c ON c.centro_costo_id = cc.id
            ORDER BY g.id, cc.id, c.id
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn articulos(&self) -> DbResult<Vec<DbArticulo>> {
        let articulos = sqlx::query_as::<_, DbArticulo>(
            "SELECT id, codigo_articulo, desc_articulo, familia_material, unidad_medida FROM articulos ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articulos)
    }

    pub async fn categorias(&self) -> DbResult<Vec<DbCategoriaCompra>> {
        let categorias = sqlx::query_as::<_, DbCategoriaCompra>(
            "SELECT id, nombre, descripcion FROM categoria_compras ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categorias)
    }

    pub async fn proveedores(&self) -> DbResult<Vec<DbProveedor>> {
        let proveedores = sqlx::query_as::<_, DbProveedor>(
            "SELECT id, codigo, razon_social FROM proveedores ORDER BY razon_social"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(proveedores)
    }
}
