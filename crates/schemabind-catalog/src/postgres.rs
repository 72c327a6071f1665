//! Live PostgreSQL catalog source
//!
//! Issues the five fixed catalog queries (information_schema plus
//! pg_catalog) scoped to the requested schema names. Works with
//! PostgreSQL 9.4+ and compatible databases.
//!
//! Enable the `postgres` Cargo feature to compile the live client;
//! without it every constructor returns a `ConfigError`.

use crate::rows::RawCatalog;
#[cfg(feature = "postgres")]
use crate::rows::{
    ColumnRow, CompositeFieldRow, CompositeRow, ConstraintKind, EnumRow, FunctionRow, KeyRow,
};
use crate::source::{CatalogSource, FetchError};

#[cfg(feature = "postgres")]
use native_tls::TlsConnector;
#[cfg(feature = "postgres")]
use postgres_native_tls::MakeTlsConnector;
#[cfg(feature = "postgres")]
use tokio_postgres::{Client, NoTls};

/// Columns with their default, nullability, and array discriminator,
/// pre-sorted by (table, ordinal position). That ordering is part of
/// the catalog contract the graph builder relies on.
const COLUMNS_QUERY: &str = "
SELECT table_schema, table_name, column_name, column_default, is_nullable, udt_name, data_type
  FROM information_schema.columns
  WHERE table_schema = ANY($1)
  ORDER BY table_name, ordinal_position
";

/// Enum labels aggregated per type in declaration order.
const ENUMS_QUERY: &str = "
SELECT n.nspname AS schema_name,
       t.typname AS name,
       string_agg(e.enumlabel, ';' ORDER BY e.enumsortorder) AS values
  FROM pg_type t
  JOIN pg_enum e ON t.oid = e.enumtypid
  JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace
  WHERE n.nspname = ANY($1)
  GROUP BY n.nspname, t.typname
";

/// Composite-type members, flat; grouped into one row per type in code.
const COMPOSITES_QUERY: &str = "
SELECT udt_schema, udt_name, attribute_name, is_nullable, attribute_udt_name, data_type, ordinal_position
  FROM information_schema.attributes
  WHERE udt_schema = ANY($1)
  ORDER BY udt_name, ordinal_position
";

const KEYS_QUERY: &str = "
SELECT tc.table_schema,
       tc.table_name,
       kcu.column_name,
       tc.constraint_type,
       ccu.table_schema AS f_schema_name,
       ccu.table_name AS f_table_name,
       ccu.column_name AS f_column_name
  FROM information_schema.table_constraints AS tc
  JOIN information_schema.key_column_usage AS kcu
    ON tc.constraint_name = kcu.constraint_name
    AND tc.table_schema = kcu.table_schema
  JOIN information_schema.constraint_column_usage AS ccu
    ON ccu.constraint_name = tc.constraint_name
    AND ccu.table_schema = tc.table_schema
  WHERE tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')
    AND tc.table_schema = ANY($1)
  ORDER BY tc.table_schema, tc.table_name, tc.constraint_type
";

/// User-defined, non-trigger, non-binary functions.
const FUNCTIONS_QUERY: &str = "
SELECT n.nspname AS schema_name,
       p.proname AS name,
       pg_get_function_arguments(p.oid) AS args,
       pg_get_function_result(p.oid) AS return_type
  FROM pg_proc p
  JOIN pg_namespace n ON p.pronamespace = n.oid
  WHERE n.nspname = ANY($1)
    AND p.probin IS NULL
    AND pg_get_function_result(p.oid) != 'trigger'
";

/// Live PostgreSQL catalog source.
pub struct PostgresSource {
    #[cfg(feature = "postgres")]
    client: Client,

    host: String,
    port: u16,
    database: String,

    #[cfg(not(feature = "postgres"))]
    _phantom: std::marker::PhantomData<()>,
}

impl PostgresSource {
    /// Connect with direct credentials, no TLS.
    #[cfg(feature = "postgres")]
    pub async fn connect(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let host = host.into();
        let database = database.into();
        let config = format!(
            "host={} port={} dbname={} user={} password={}",
            host,
            port,
            database,
            user.into(),
            password.into()
        );

        let (client, connection) = tokio_postgres::connect(&config, NoTls)
            .await
            .map_err(|e| {
                FetchError::AuthenticationError(format!(
                    "failed to connect to PostgreSQL at {}:{}: {}",
                    host, port, e
                ))
            })?;

        let endpoint = format!("{}:{}", host, port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("PostgreSQL connection error ({}): {}", endpoint, e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
        })
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn connect(
        _host: impl Into<String>,
        _port: u16,
        _database: impl Into<String>,
        _user: impl Into<String>,
        _password: impl Into<String>,
    ) -> Result<Self, FetchError> {
        Err(Self::feature_disabled())
    }

    /// Connect from a libpq-style connection string, no TLS.
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string(conn_str: &str) -> Result<Self, FetchError> {
        let (host, port, database) = Self::endpoint_from(conn_str)?;

        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(|e| FetchError::AuthenticationError(format!("failed to connect: {}", e)))?;

        let endpoint = format!("{}:{}", host, port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("PostgreSQL connection error ({}): {}", endpoint, e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
        })
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string(_conn_str: &str) -> Result<Self, FetchError> {
        Err(Self::feature_disabled())
    }

    /// Connect from a libpq-style connection string over TLS.
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string_with_tls(conn_str: &str) -> Result<Self, FetchError> {
        let (host, port, database) = Self::endpoint_from(conn_str)?;

        let connector = TlsConnector::builder()
            .build()
            .map_err(|e| FetchError::ConfigError(format!("failed to create TLS connector: {}", e)))?;
        let tls = MakeTlsConnector::new(connector);

        let (client, connection) = tokio_postgres::connect(conn_str, tls)
            .await
            .map_err(|e| {
                FetchError::AuthenticationError(format!("failed to connect with TLS: {}", e))
            })?;

        let endpoint = format!("{}:{}", host, port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("PostgreSQL TLS connection error ({}): {}", endpoint, e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
        })
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string_with_tls(_conn_str: &str) -> Result<Self, FetchError> {
        Err(Self::feature_disabled())
    }

    #[cfg(feature = "postgres")]
    fn endpoint_from(conn_str: &str) -> Result<(String, u16, String), FetchError> {
        let config: tokio_postgres::Config = conn_str
            .parse()
            .map_err(|e| FetchError::ConfigError(format!("invalid connection string: {}", e)))?;

        let host = match config.get_hosts().first() {
            Some(tokio_postgres::config::Host::Tcp(host)) => host.clone(),
            #[cfg(unix)]
            Some(tokio_postgres::config::Host::Unix(path)) => path.display().to_string(),
            None => "localhost".to_string(),
        };
        let port = config.get_ports().first().copied().unwrap_or(5432);
        let database = config.get_dbname().unwrap_or("postgres").to_string();
        Ok((host, port, database))
    }

    #[cfg(not(feature = "postgres"))]
    fn feature_disabled() -> FetchError {
        FetchError::ConfigError(
            "PostgreSQL support not compiled. Rebuild with: cargo build --features postgres"
                .to_string(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    #[cfg(feature = "postgres")]
    async fn fetch_columns(&self, schemas: &[String]) -> Result<Vec<ColumnRow>, FetchError> {
        let rows = self
            .client
            .query(COLUMNS_QUERY, &[&schemas])
            .await
            .map_err(|e| FetchError::QueryError(format!("columns query failed: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| ColumnRow {
                schema: row.get(0),
                table: row.get(1),
                name: row.get(2),
                default: row.get(3),
                nullable: row.get::<_, String>(4) == "YES",
                udt_name: row.get(5),
                data_type: row.get(6),
            })
            .collect())
    }

    #[cfg(feature = "postgres")]
    async fn fetch_enums(&self, schemas: &[String]) -> Result<Vec<EnumRow>, FetchError> {
        let rows = self
            .client
            .query(ENUMS_QUERY, &[&schemas])
            .await
            .map_err(|e| FetchError::QueryError(format!("enums query failed: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| EnumRow {
                schema: row.get(0),
                name: row.get(1),
                values: row.get(2),
            })
            .collect())
    }

    #[cfg(feature = "postgres")]
    async fn fetch_composites(&self, schemas: &[String]) -> Result<Vec<CompositeRow>, FetchError> {
        let rows = self
            .client
            .query(COMPOSITES_QUERY, &[&schemas])
            .await
            .map_err(|e| FetchError::QueryError(format!("composite types query failed: {}", e)))?;

        // Rows are ordered by type name; group consecutive members.
        let mut composites: Vec<CompositeRow> = Vec::new();
        for row in &rows {
            let schema: String = row.get(0);
            let name: String = row.get(1);
            let field = CompositeFieldRow {
                name: row.get(2),
                nullable: row.get::<_, String>(3) == "YES",
                udt_name: row.get(4),
                data_type: row.get(5),
                ordinal: row.get(6),
            };

            match composites.last_mut() {
                Some(last) if last.schema == schema && last.name == name => {
                    last.fields.push(field);
                }
                _ => composites.push(CompositeRow {
                    schema,
                    name,
                    fields: vec![field],
                }),
            }
        }

        Ok(composites)
    }

    #[cfg(feature = "postgres")]
    async fn fetch_keys(&self, schemas: &[String]) -> Result<Vec<KeyRow>, FetchError> {
        let rows = self
            .client
            .query(KEYS_QUERY, &[&schemas])
            .await
            .map_err(|e| FetchError::QueryError(format!("keys query failed: {}", e)))?;

        let mut keys = Vec::with_capacity(rows.len());
        for row in &rows {
            let constraint = match row.get::<_, String>(3).as_str() {
                "PRIMARY KEY" => ConstraintKind::PrimaryKey,
                "FOREIGN KEY" => ConstraintKind::ForeignKey,
                other => {
                    return Err(FetchError::InvalidResponse(format!(
                        "unexpected constraint type '{}'",
                        other
                    )))
                }
            };
            keys.push(KeyRow {
                schema: row.get(0),
                table: row.get(1),
                column: row.get(2),
                constraint,
                target_schema: row.get(4),
                target_table: row.get(5),
                target_column: row.get(6),
            });
        }

        Ok(keys)
    }

    #[cfg(feature = "postgres")]
    async fn fetch_functions(&self, schemas: &[String]) -> Result<Vec<FunctionRow>, FetchError> {
        let rows = self
            .client
            .query(FUNCTIONS_QUERY, &[&schemas])
            .await
            .map_err(|e| FetchError::QueryError(format!("functions query failed: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| FunctionRow {
                schema: row.get(0),
                name: row.get(1),
                args: row.get(2),
                return_type: row.get(3),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogSource for PostgresSource {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    #[cfg(feature = "postgres")]
    async fn fetch_catalog(&self, schemas: &[String]) -> Result<RawCatalog, FetchError> {
        // The five fetches pipeline on the shared connection; the
        // returned snapshot is complete before any building starts.
        let (columns, enums, composites, keys, functions) = tokio::try_join!(
            self.fetch_columns(schemas),
            self.fetch_enums(schemas),
            self.fetch_composites(schemas),
            self.fetch_keys(schemas),
            self.fetch_functions(schemas),
        )?;

        Ok(RawCatalog {
            columns,
            enums,
            composites,
            keys,
            functions,
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn fetch_catalog(&self, _schemas: &[String]) -> Result<RawCatalog, FetchError> {
        Err(Self::feature_disabled())
    }

    #[cfg(feature = "postgres")]
    async fn test_connection(&self) -> Result<(), FetchError> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| FetchError::NetworkError(format!("connection test failed: {}", e)))?;
        Ok(())
    }

    #[cfg(not(feature = "postgres"))]
    async fn test_connection(&self) -> Result<(), FetchError> {
        Err(Self::feature_disabled())
    }
}
