use keydeck::host::{EditableSurface, EditorHost, NoticeLevel, TerminalSurface};
use keydeck::remote::server::ServerConfig;
use keydeck::remote::{ServerController, StatusIndicator};
use std::io::BufRead;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Reference host for running the listener without an embedding editor:
/// every capability logs instead of touching editor state, and no surfaces
/// are ever active.
struct LoggingHost;

impl EditorHost for LoggingHost {
    fn invoke(&self, command: &str) -> oneshot::Receiver<Result<(), String>> {
        log::info!("editor action requested: {command}");
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Ok(()));
        rx
    }

    fn active_editor(&self) -> Option<Arc<dyn EditableSurface>> {
        None
    }

    fn active_terminal(&self) -> Option<Arc<dyn TerminalSurface>> {
        None
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Warning => log::warn!("[host] {message}"),
            NoticeLevel::Error => log::error!("[host] {message}"),
        }
    }
}

struct LogIndicator;

impl StatusIndicator for LogIndicator {
    fn set_running(&self, running: bool) {
        log::info!("listener {}", if running { "running" } else { "stopped" });
    }
}

fn parse_args() -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--listen" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--listen requires an address"))?;
                config.listen_addr = value.parse::<IpAddr>()?;
            }
            "--port" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--port requires a number"))?;
                config.port = value.parse()?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = parse_args()?;
    let mut controller =
        ServerController::new(config, Arc::new(LoggingHost), Arc::new(LogIndicator));
    controller.start()?;

    match controller.status().port() {
        Some(port) => println!("keydeck listening on port {port}"),
        None => println!("keydeck listener not running"),
    }
    println!("commands: start | stop | status | quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line?.trim() {
            "start" => {
                if let Err(e) = controller.start() {
                    eprintln!("start failed: {e}");
                }
            }
            "stop" => controller.stop(),
            "status" => match controller.status().port() {
                Some(port) => println!("running on port {port}"),
                None => println!("stopped"),
            },
            "quit" | "q" => break,
            "" => {}
            other => println!("unknown command: {other}"),
        }
    }

    controller.stop();
    Ok(())
}
