//! SQL Server implementation of the Demo store.

use crate::error::DemoStoreError;
use crate::store::{Connector, DemoRecord, DemoStore};
use crate::target::ConnectionTarget;
use async_trait::async_trait;
use tiberius::{Client, Config, Row, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

/// Parameterized insert of one Demo row (name, content).
pub const INSERT_DEMO_SQL: &str =
    "INSERT INTO [Demo] ([DemoName], [DemoContent]) VALUES (@P1, @P2)";

/// Most recently inserted Demo row.
pub const SELECT_LATEST_DEMO_SQL: &str =
    "SELECT TOP 1 [DemoId], [DemoName], [DemoContent] FROM [Demo] ORDER BY [DemoId] DESC";

type TdsClient = Client<Compat<TcpStream>>;

/// Connects to SQL Server over TCP using SQL Server authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerConnector;

#[async_trait]
impl Connector for SqlServerConnector {
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn DemoStore>, DemoStoreError> {
        let address = target.address()?;
        let config = target.to_tiberius_config()?;

        info!("Connecting to SQL Server: {}", target.ado_string());
        let tcp = open_tcp(&config, address.uses_sql_browser()).await?;

        let client = match Client::connect(config.clone(), tcp.compat_write()).await {
            Ok(client) => client,
            // Azure SQL gateways may redirect the login to another node.
            Err(tiberius::error::Error::Routing { host, port }) => {
                info!("SQL Server redirected connection to {}:{}", host, port);
                let mut config = config;
                config.host(&host);
                config.port(port);
                let tcp = open_tcp(&config, false).await?;
                Client::connect(config, tcp.compat_write()).await?
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Connected to SQL Server");
        Ok(Box::new(SqlServerDemoStore { client }))
    }
}

async fn open_tcp(config: &Config, sql_browser: bool) -> Result<TcpStream, DemoStoreError> {
    let addr = config.get_addr();

    let tcp = if sql_browser {
        TcpStream::connect_named(config).await?
    } else {
        TcpStream::connect(&addr)
            .await
            .map_err(|source| DemoStoreError::Connect {
                server: addr.clone(),
                source,
            })?
    };

    tcp.set_nodelay(true)
        .map_err(|source| DemoStoreError::Connect {
            server: addr,
            source,
        })?;
    Ok(tcp)
}

/// An open SQL Server connection bound to the Demo table.
pub struct SqlServerDemoStore {
    client: TdsClient,
}

#[async_trait]
impl DemoStore for SqlServerDemoStore {
    async fn insert_demo(&mut self, name: &str, content: &str) -> Result<u64, DemoStoreError> {
        let result = self
            .client
            .execute(INSERT_DEMO_SQL, &[&name, &content])
            .await?;
        Ok(result.total())
    }

    async fn latest_demo(&mut self) -> Result<Option<DemoRecord>, DemoStoreError> {
        let row = self
            .client
            .query(SELECT_LATEST_DEMO_SQL, &[])
            .await?
            .into_row()
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn close(self: Box<Self>) -> Result<(), DemoStoreError> {
        self.client.close().await?;
        debug!("Closed SQL Server connection");
        Ok(())
    }
}

fn record_from_row(row: &Row) -> Result<DemoRecord, DemoStoreError> {
    let id = row
        .try_get::<i32, _>(0)?
        .ok_or_else(|| DemoStoreError::UnexpectedRow("DemoId is NULL".to_string()))?;
    let name = row.try_get::<&str, _>(1)?.map(str::to_string);
    let content = row.try_get::<&str, _>(2)?.map(str::to_string);

    Ok(DemoRecord { id, name, content })
}
