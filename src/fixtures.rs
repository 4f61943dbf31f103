#[cfg(test)]
pub mod test {
    use crate::program::{GroupConfig, ProgramConfig};

    fn program(name: &str, directory: &str, user: &str, log_directory: &str) -> ProgramConfig {
        ProgramConfig::new(name, directory, user, log_directory).unwrap()
    }

    pub fn myapp() -> ProgramConfig {
        program("myapp", "/opt/myapp", "deploy", "/var/log/myapp")
            .with_startretries(10)
            .with_environment([("APP_ENV", "production")])
    }

    /// `api-server` sets startretries to its default value (3).
    pub fn microservices() -> GroupConfig {
        let api = program("api-server", "/opt/api-server", "deploy", "/var/log/services")
            .with_startretries(3);
        let worker =
            program("worker", "/opt/worker", "deploy", "/var/log/services").with_autostart(false);

        GroupConfig::new("microservices")
            .unwrap()
            .add_program(api)
            .add_program(worker)
    }

    pub fn advanced() -> ProgramConfig {
        program(
            "advanced-service",
            "/opt/advanced",
            "performance",
            "/var/log/advanced",
        )
        .with_stopwaitsecs(60)
        .with_stopsignal("INT")
        .with_priority(100)
        .with_killasgroup(true)
        .with_exitcodes([0, 1, 2])
    }

    pub fn customized() -> ProgramConfig {
        program("service1", "/opt/service1", "deploy", "/var/log/services")
            .with_startretries(50)
            .with_log_max_bytes("100MB")
            .with_redirect_stderr(true)
    }

    pub fn multi_instance() -> ProgramConfig {
        program("web-server", "/opt/web-server", "deploy", "/var/log/cluster")
            .with_numprocs(3)
            .with_process_name("%(program_name)s_%(process_num)02d")
            .with_environment([("PORT_BASE", "8080")])
    }

    pub fn high_performance() -> ProgramConfig {
        program("high-perf", "/opt/high-perf", "performance", "/var/log/perf")
            .with_startretries(100)
            .with_stopwaitsecs(60)
            .with_log_max_bytes("500MB")
            .with_log_backups(50)
            .with_priority(1)
    }

    /// Sets stopasgroup to its default (false).
    pub fn development() -> ProgramConfig {
        program("dev-service", "/home/dev/service", "developer", "/tmp/dev-logs")
            .with_autostart(false)
            .with_autorestart(false)
            .with_startretries(1)
            .with_log_max_bytes("10MB")
            .with_log_backups(3)
            .with_redirect_stderr(true)
            .with_stopasgroup(false)
            .with_environment([("NODE_ENV", "development")])
    }

    /// Sets killasgroup to its default (false).
    pub fn custom_exit_codes() -> ProgramConfig {
        program(
            "exit-service",
            "/opt/exit-service",
            "exit-user",
            "/var/log/exit",
        )
        .with_exitcodes([0, 1, 2, 130])
        .with_stopsignal("QUIT")
        .with_killasgroup(false)
    }

    pub fn mega_cluster() -> GroupConfig {
        let mut group = GroupConfig::new("mega-cluster").unwrap();
        for i in 1..=3 {
            let name = format!("service{i}");
            group.push(
                program(&name, &format!("/opt/{name}"), "cluster-user", "/var/log/cluster")
                    .with_priority(50)
                    .with_numprocs(2)
                    .with_process_name("%(program_name)s-%(process_num)02d")
                    .with_env("CLUSTER_MODE", "production"),
            );
        }
        group
    }

    pub fn microservice_cluster() -> GroupConfig {
        let gateway = program("api-gateway", "/opt/gateway", "deploy", "/var/log/cluster")
            .with_priority(1)
            .with_numprocs(2)
            .with_process_name("%(program_name)s-%(process_num)02d")
            .with_env("SERVICE_TYPE", "gateway");
        let users = program(
            "user-service",
            "/opt/user-service",
            "deploy",
            "/var/log/cluster",
        )
        .with_startretries(5)
        .with_stopwaitsecs(30);
        let orders = program(
            "order-service",
            "/opt/order-service",
            "deploy",
            "/var/log/cluster",
        )
        .with_autorestart(false)
        .with_log_max_bytes("200MB");

        GroupConfig::new("microservice-cluster")
            .unwrap()
            .add_program(gateway)
            .add_program(users)
            .add_program(orders)
    }

    pub const SERVICES_MANIFEST: &str = r#"
[group]
name = "microservices"

[[program]]
name = "api-server"
directory = "/opt/api-server"
user = "deploy"
log_directory = "/var/log/services"
startretries = 3

[[program]]
name = "worker"
directory = "/opt/worker"
user = "deploy"
log_directory = "/var/log/services"
autostart = false
"#;
}
