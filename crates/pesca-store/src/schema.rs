//! Table definitions.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Landing records table.
pub const PRODUCTION_TABLE: &str = "produccion_pesquera";

/// Idempotent schema bootstrap.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS produccion_pesquera (
    id SERIAL PRIMARY KEY,
    rnp_activo BIGINT,
    nombre_activo VARCHAR(255),
    clave_sitio_desembarque VARCHAR(50),
    nombre_sitio_desembarque VARCHAR(255),
    rnpa_unidad_economica BIGINT,
    unidad_economica VARCHAR(500),
    nombre_estado VARCHAR(100),
    clave_oficina VARCHAR(20),
    nombre_oficina VARCHAR(255),
    tipo_aviso VARCHAR(50),
    folio_aviso VARCHAR(50),
    fecha_aviso VARCHAR(50),
    origen VARCHAR(100),
    clave_lugar_captura VARCHAR(50),
    nombre_lugar_captura VARCHAR(255),
    numero_embarcaciones INTEGER,
    mes_corte VARCHAR(50),
    ano_corte INTEGER,
    periodo_inicio VARCHAR(50),
    periodo_fin VARCHAR(50),
    duracion INTEGER,
    dias_efectivos INTEGER,
    tipo_zona VARCHAR(50),
    produccion_acuacultural VARCHAR(10),
    numero_permiso VARCHAR(100),
    fecha_expedicion VARCHAR(50),
    fecha_vigencia VARCHAR(50),
    nombre_principal VARCHAR(255),
    clave_especie VARCHAR(50),
    nombre_especie VARCHAR(500),
    peso_desembarcado_kilogramos NUMERIC(15, 2),
    peso_vivo_kilogramos NUMERIC(15, 2),
    precio_pesos NUMERIC(15, 2),
    valor_pesos NUMERIC(15, 2),
    litoral VARCHAR(100),
    created_at TIMESTAMP DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_produccion_ano ON produccion_pesquera(ano_corte);
CREATE INDEX IF NOT EXISTS idx_produccion_estado ON produccion_pesquera(nombre_estado);
CREATE INDEX IF NOT EXISTS idx_produccion_especie ON produccion_pesquera(nombre_principal);
CREATE INDEX IF NOT EXISTS idx_produccion_litoral ON produccion_pesquera(litoral);

CREATE TABLE IF NOT EXISTS sugerencias (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    sugerencia TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT NOW()
);
"#;

/// Create tables and indexes that do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            assert!(
                statement.starts_with("CREATE TABLE IF NOT EXISTS")
                    || statement.starts_with("CREATE INDEX IF NOT EXISTS"),
                "{}",
                statement
            );
        }
    }

    #[test]
    fn test_decimal_columns() {
        for column in ["peso_vivo_kilogramos", "precio_pesos", "valor_pesos"] {
            assert!(SCHEMA.contains(&format!("{} NUMERIC(15, 2)", column)));
        }
    }
}
