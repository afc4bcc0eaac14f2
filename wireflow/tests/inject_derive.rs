use std::sync::Arc;

use wireflow::prelude::*;

#[interface]
trait Mailer {
    fn send(&self, to: &str) -> String;
}

#[interface]
trait AuditSink: Send + Sync {
    fn record(&self) -> &'static str;
}

struct Smtp(&'static str);

impl Mailer for Smtp {
    fn send(&self, to: &str) -> String {
        format!("{} -> {to}", self.0)
    }
}

struct Audit(&'static str);

impl AuditSink for Audit {
    fn record(&self) -> &'static str {
        self.0
    }
}

#[derive(Inject)]
struct SignupService {
    mailer: Arc<dyn Mailer>,
    #[inject(name = "backup")]
    backup: Arc<dyn Mailer>,
    sinks: Vec<Arc<dyn AuditSink>>,
    greeting: Option<Arc<String>>,
}

#[derive(Inject)]
struct Nothing;

fn container() -> DIContainer {
    let c = DIContainer::new();
    c.provide(Binding::<dyn Mailer>::instance(Arc::new(Smtp("primary"))))
        .unwrap();
    c.provide(Binding::<dyn Mailer>::instance(Arc::new(Smtp("secondary"))).named("backup"))
        .unwrap();
    c.provide(Binding::<dyn AuditSink>::instance(Arc::new(Audit("db"))))
        .unwrap();
    c.provide(Binding::<dyn AuditSink>::factory(|| Arc::new(Audit("log")) as Arc<dyn AuditSink>))
        .unwrap();
    c
}

#[tokio::test]
async fn derive_resolves_fields() {
    let c = container();
    let service: SignupService = c.inject().await.unwrap();

    assert_eq!(service.mailer.send("ada"), "primary -> ada");
    assert_eq!(service.backup.send("ada"), "secondary -> ada");
    assert_eq!(
        service.sinks.iter().map(|s| s.record()).collect::<Vec<_>>(),
        vec!["db", "log"]
    );
    assert!(service.greeting.is_none());
}

#[tokio::test]
async fn derive_sees_optional_binding_once_provided() {
    let c = container();
    c.provide_concrete(Binding::value(String::from("welcome")))
        .unwrap();

    let service = SignupService::inject(&c).await.unwrap();
    assert_eq!(service.greeting.as_deref().map(String::as_str), Some("welcome"));
}

#[tokio::test]
async fn derive_reports_missing_named_binding() {
    let c = DIContainer::new();
    c.provide(Binding::<dyn Mailer>::instance(Arc::new(Smtp("primary"))))
        .unwrap();

    match c.inject::<SignupService>().await {
        Err(ContainerError::Lookup(err)) => assert_eq!(err.name.as_deref(), Some("backup")),
        Err(other) => panic!("Expected LookupError, got: {other:?}"),
        Ok(_) => panic!("Expected LookupError, got a service"),
    }
}

#[tokio::test]
async fn unit_struct_injects_from_empty_container() {
    let c = DIContainer::new();
    assert!(c.inject::<Nothing>().await.is_ok());
}

#[test]
fn interface_attribute_implements_marker() {
    fn is_interface<I: ?Sized + Interface>() {}
    is_interface::<dyn Mailer>();
    is_interface::<dyn AuditSink>();
}
