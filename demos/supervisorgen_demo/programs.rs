//! The cluster rendered by the `showcase` command.
//!
//! Three services, each customized a different way:
//!
//! - `api-gateway` runs two instances and carries an environment variable.
//! - `user-service` sets `startretries` to 3, the supervisord default. The
//!   explicit policy still renders it; `--policy non-default` does not.
//! - `order-service` disables autorestart and raises the log size.

use supervisorgen::{GroupConfig, ProgramConfig, SupervisorError};

pub fn cluster() -> Result<GroupConfig, SupervisorError> {
    let gateway = ProgramConfig::new("api-gateway", "/opt/gateway", "deploy", "/var/log/cluster")?
        .with_priority(1)
        .with_numprocs(2)
        .with_process_name("%(program_name)s-%(process_num)02d")
        .with_env("SERVICE_TYPE", "gateway");

    let users = ProgramConfig::new(
        "user-service",
        "/opt/user-service",
        "deploy",
        "/var/log/cluster",
    )?
    .with_startretries(3)
    .with_stopwaitsecs(30);

    let orders = ProgramConfig::new(
        "order-service",
        "/opt/order-service",
        "deploy",
        "/var/log/cluster",
    )?
    .with_autorestart(false)
    .with_log_max_bytes("200MB")
    .with_exitcodes([0, 2]);

    Ok(GroupConfig::new("microservice-cluster")?
        .add_program(gateway)
        .add_program(users)
        .add_program(orders))
}
