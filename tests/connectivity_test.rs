//! Live SQL Server checks. Requires a reachable server with a `Demo` table:
//!
//! ```sql
//! CREATE TABLE Demo (
//!     DemoId INT IDENTITY(1,1) PRIMARY KEY,
//!     DemoName NVARCHAR(100),
//!     DemoContent NVARCHAR(100)
//! );
//! ```
//!
//! Run with `MSSQL_SERVER=... MSSQL_USER=... MSSQL_PASSWORD=... MSSQL_DATABASE=...
//! cargo test --test connectivity_test -- --ignored`.

use sqlserver_demo::{ConnectionTarget, Connector, SqlServerConnector};

fn live_target() -> ConnectionTarget {
    let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.into());
    ConnectionTarget {
        server: var("MSSQL_SERVER", "mssql,1433"),
        database: var("MSSQL_DATABASE", "master"),
        user: var("MSSQL_USER", "sa"),
        password: var("MSSQL_PASSWORD", "Passw0rd!"),
        trust_server_certificate: true,
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires a running SQL Server"]
async fn test_sqlserver_write_then_read_latest() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SqlServerConnector.connect(&live_target()).await?;

    let stamp = dbtest::timestamp::now();
    let affected = store.insert_demo(&stamp, &stamp).await?;
    assert_eq!(affected, 1);

    let latest = store.latest_demo().await?.expect("Demo table has a row");
    assert_eq!(latest.name.as_deref(), Some(stamp.as_str()));
    assert_eq!(latest.content.as_deref(), Some(stamp.as_str()));

    store.close().await?;
    Ok(())
}
