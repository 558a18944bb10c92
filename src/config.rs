use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use sea_orm::ConnectOptions;
use tracing::info;

use crate::audit::AuditFailurePolicy;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub audit_failure_policy: AuditFailurePolicy,

    pub run_migrations: bool,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: load_database_opt().into(),
        jwt_key: load_jwt_key(),
        audit_failure_policy: load_audit_failure_policy(),
        run_migrations: load_run_migrations(),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn load_database_opt() -> impl Into<ConnectOptions> {
    info!("Loading environment `DATABASE_URL`");

    env::var("DATABASE_URL").expect("Environment `DATABASE_URL` is required to be set")
}

fn load_jwt_key() -> String {
    info!("Loading environment `JWT_SECRET`");

    env::var("JWT_SECRET").expect("Environment `JWT_SECRET` is required to be set")
}

fn load_audit_failure_policy() -> AuditFailurePolicy {
    info!("Loading environment `AUDIT_FAILURE_POLICY`");

    env::var("AUDIT_FAILURE_POLICY")
        .map(|var| var.parse().expect("`AUDIT_FAILURE_POLICY` must be `ignore` or `fail-operation`"))
        .unwrap_or_default()
}

fn load_run_migrations() -> bool {
    info!("Loading environment `RUN_MIGRATIONS`");

    env::var("RUN_MIGRATIONS")
        .map(|var| parse_flag(&var).expect("`RUN_MIGRATIONS` must be `true` or `false`"))
        .unwrap_or(true)
}

fn parse_flag(var: &str) -> Option<bool> {
    match var.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
