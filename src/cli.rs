use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ensemble::Orchestrator;
use ensemble::config::{ConfigLoader, EnsembleConfig};
use ensemble::guide::GUIDE;
use ensemble::report::BatchReporter;
use ensemble::workload::Workload;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径，未指定时自动查找 ensemble.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 执行工作负载文件（"-" 表示从标准输入读取）并输出结果
    Run {
        path: String,

        /// 输出原始 JSON 结果而不是表格
        #[arg(long)]
        json: bool,

        /// 显示每个响应的 header 与响应体
        #[arg(short, long)]
        verbose: bool,

        /// 强制严格顺序执行
        #[arg(long)]
        strict: bool,

        /// 覆盖批次截止时间（毫秒）
        #[arg(long, value_name = "MS")]
        timeout: Option<i64>,
    },
    /// 以 HTTP 服务方式接收工作负载
    Serve {
        /// 监听地址，覆盖配置文件
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// 输出工作负载格式说明
    Guide,
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Guide => {
            println!("{}", GUIDE);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { addr } => {
            let mut config = load_config(cli.config)?;
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            ensemble::server::serve(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            path,
            json,
            verbose,
            strict,
            timeout,
        } => {
            let config = load_config(cli.config)?;
            let mut workload = read_workload(&path)?;
            if strict {
                workload.strict_order = true;
            }
            if let Some(timeout) = timeout {
                workload.timeout = timeout;
            }

            let orchestrator = Orchestrator::from_config(&config.engine)?;
            let result = orchestrator.execute(workload).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                BatchReporter::new(verbose).print(&path, &result);
            }

            Ok(if result.is_failure() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EnsembleConfig> {
    ConfigLoader::resolve(path.as_deref()).context("unable to load configuration")
}

fn read_workload(path: &str) -> Result<Workload> {
    let text = if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("unable to read workload from stdin")?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("unable to read {}", path))?
    };

    Workload::from_json(&text).with_context(|| format!("unable to parse workload {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "ensemble", "run", "batch.json", "--json", "--strict", "--timeout", "2500",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                path,
                json,
                verbose,
                strict,
                timeout,
            } => {
                assert_eq!(path, "batch.json");
                assert!(json && strict && !verbose);
                assert_eq!(timeout, Some(2500));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_config() {
        let cli = Cli::try_parse_from([
            "ensemble",
            "serve",
            "--addr",
            "0.0.0.0:9000",
            "--config",
            "ensemble.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("ensemble.toml")));
        assert!(matches!(
            cli.command,
            Commands::Serve { addr: Some(addr) } if addr.port() == 9000
        ));
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(Cli::try_parse_from(["ensemble", "serve", "--addr", "nowhere"]).is_err());
    }

    #[test]
    fn test_read_workload_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"requests":[{"id":"1","url":"http://localhost/a","method":"GET"}]}"#)
            .unwrap();
        file.flush().unwrap();

        let workload = read_workload(file.path().to_str().unwrap()).unwrap();
        assert_eq!(workload.requests.len(), 1);
        assert!(!workload.strict_order);
    }

    #[test]
    fn test_read_workload_reports_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        file.flush().unwrap();

        let err = read_workload(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("unable to parse workload"));
    }
}
