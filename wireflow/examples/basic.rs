//! Basic example of the Wireflow DI container.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use wireflow::prelude::*;

// === Define your interfaces and types ===

#[interface]
trait Logger {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

#[interface]
trait Database {
    fn query(&self, sql: &str) -> String;
}

struct Postgres {
    url: String,
    connection: u64,
}

impl Database for Postgres {
    fn query(&self, sql: &str) -> String {
        format!("{sql} on {} (connection #{})", self.url, self.connection)
    }
}

#[interface]
trait Notifier {
    fn notify(&self, user: u64) -> String;
}

struct Email;
struct Sms;

impl Notifier for Email {
    fn notify(&self, user: u64) -> String {
        format!("email sent to user {user}")
    }
}

impl Notifier for Sms {
    fn notify(&self, user: u64) -> String {
        format!("sms sent to user {user}")
    }
}

#[derive(Inject)]
struct UserService {
    logger: Arc<dyn Logger>,
    #[inject(name = "replica")]
    db: Arc<dyn Database>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        let row = self.db.query(&format!("SELECT * FROM users WHERE id = {id}"));
        for notifier in &self.notifiers {
            self.logger.log(&notifier.notify(id));
        }
        row
    }
}

struct NotifierProvider;

impl Provider for NotifierProvider {
    fn register(&self, container: &DIContainer) -> Result<()> {
        container.provide(Binding::<dyn Notifier>::instance(Arc::new(Email)).implemented_by::<Email>())?;
        container.provide(Binding::<dyn Notifier>::instance(Arc::new(Sms)).implemented_by::<Sms>())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("wireflow_container=debug")
        .init();

    let container = global();
    let connections = Arc::new(AtomicU64::new(0));

    // Logger: one shared instance
    container.provide(Binding::<dyn Logger>::instance(Arc::new(ConsoleLogger)))?;

    // Primary database, transient: a new connection per resolve
    let counter = connections.clone();
    container.provide(
        Binding::<dyn Database>::factory(move || {
            Arc::new(Postgres {
                url: "postgres://primary/app".to_string(),
                connection: counter.fetch_add(1, Ordering::SeqCst),
            }) as Arc<dyn Database>
        })
        .implemented_by::<Postgres>()
        .named("primary"),
    )?;

    // Replica, async singleton: connected on first use
    container.provide(
        Binding::<dyn Database>::async_factory(|| async {
            tokio::task::yield_now().await;
            Arc::new(Postgres {
                url: "postgres://replica/app".to_string(),
                connection: 0,
            }) as Arc<dyn Database>
        })
        .implemented_by::<Postgres>()
        .singleton(true)
        .named("replica"),
    )?;

    container.install(&NotifierProvider)?;

    println!("Container ready: {container:?}");

    let service: UserService = container.inject().await?;
    println!("{}", service.get_user(42));

    let primary = container.resolve::<dyn Database>().await?;
    println!("{}", primary.query("SELECT 1"));

    for binding in container.snapshot().interfaces {
        println!("{} -> {} binding(s)", binding.interface, binding.bindings.len());
    }

    container.delete::<dyn Notifier>();
    match container.resolve_all::<dyn Notifier>().await {
        Err(err) => println!("After delete: {err}"),
        Ok(all) => println!("Still {} notifiers?", all.len()),
    }

    Ok(())
}
