use lazy_static::lazy_static;
use std::sync::Arc;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create a static CLI instance
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        // Start PostgreSQL container
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("Database connection error: {}", e);
            }
        });

        Ok(client)
    }

    pub async fn execute(&self, sql: &str) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;
        client.batch_execute(sql).await?;

        Ok(())
    }

    /// Creates a `posts` table that carries a title besides its rank columns
    /// but no boost column.
    pub async fn create_posts_table(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;
        client
            .batch_execute(
                "CREATE TABLE posts (
                    id SERIAL PRIMARY KEY,
                    title TEXT NOT NULL DEFAULT 'untitled',
                    hotness DOUBLE PRECISION NOT NULL,
                    hotness_at TIMESTAMPTZ NOT NULL
                )"
            )
            .await?;

        Ok(())
    }
}
