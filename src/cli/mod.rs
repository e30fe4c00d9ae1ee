mod preview;
mod upload;

use anyhow::Result;
use console::style;

use crate::api::models::SensorKind;
use crate::core::config;
use crate::core::terminal::{self, GuideSection, print_error};
use crate::interfaces::tui::TuiApp;

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Pantallas")
        .command("tui", "Abrir el panel de monitoreo interactivo")
        .print();

    GuideSection::new("Operaciones")
        .command("upload", "Subir un CSV de sensor (--file, --sensor-type)")
        .command("status", "Consultar el estado de una tarea (<task_id>)")
        .command("preview", "Ver las últimas filas de una colección (<endpoint>)")
        .print();

    GuideSection::new("Opciones")
        .command("--api-url <url>", "URL base de la API de ingesta")
        .command("--watch", "upload: esperar a que la tarea termine")
        .print();

    println!(
        "\n {} {} <comando> [opciones]\n",
        style("Uso:").bold(),
        style("ecovista").green()
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadArgs {
    pub file: String,
    pub sensor_type: Option<SensorKind>,
    pub watch: bool,
    pub api_url: String,
}

pub(crate) fn parse_upload_args(args: &[String], start: usize) -> UploadArgs {
    let mut file = String::new();
    let mut sensor_type = None;
    let mut watch = false;
    let mut api_url = String::new();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--sensor-type" | "-t" => {
                if i + 1 < args.len() {
                    sensor_type = SensorKind::parse(&args[i + 1]);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--watch" | "-w" => {
                watch = true;
                i += 1;
            }
            "--api-url" => {
                if i + 1 < args.len() {
                    api_url = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    UploadArgs {
        file,
        sensor_type,
        watch,
        api_url,
    }
}

pub(crate) fn parse_api_url_flag(args: &[String], start: usize) -> String {
    let mut api_url = String::new();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 < args.len() {
                    api_url = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    api_url
}

/// First non-flag argument after `start`, used by `preview` and `status`.
pub(crate) fn first_positional(args: &[String], start: usize) -> Option<String> {
    let mut i = start;
    while i < args.len() {
        if args[i].starts_with('-') {
            // All our flags take a value.
            i += 2;
        } else {
            return Some(args[i].clone());
        }
    }
    None
}

pub async fn run_main() -> Result<()> {
    crate::logging::init()?;
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        let cmd = args[1].as_str();
        match cmd {
            "tui" => {
                let api_url = config::resolve_api_url(&parse_api_url_flag(&args, 2));
                let mut app = TuiApp::new(api_url);
                app.run_tui().await?;
                return Ok(());
            }
            "upload" => {
                let parsed = parse_upload_args(&args, 2);
                upload::run_upload(parsed).await?;
                return Ok(());
            }
            "status" => {
                let Some(task_id) = first_positional(&args, 2) else {
                    print_error("Falta el identificador de la tarea.");
                    print_help();
                    return Ok(());
                };
                let api_url = config::resolve_api_url(&parse_api_url_flag(&args, 2));
                upload::run_status(&task_id, api_url).await?;
                return Ok(());
            }
            "preview" => {
                let Some(endpoint) = first_positional(&args, 2) else {
                    print_error("Falta la colección (air-quality, sound, buried).");
                    print_help();
                    return Ok(());
                };
                let Some(kind) = SensorKind::parse(&endpoint) else {
                    print_error(&format!("Colección desconocida: {}", endpoint));
                    print_help();
                    return Ok(());
                };
                let api_url = config::resolve_api_url(&parse_api_url_flag(&args, 2));
                preview::run_preview(kind, api_url).await?;
                return Ok(());
            }
            "help" | "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                print_error(&format!("Comando desconocido: {}", other));
                print_help();
                return Ok(());
            }
        }
    }

    // No subcommand: open the dashboard.
    let api_url = config::resolve_api_url("");
    let mut app = TuiApp::new(api_url);
    app.run_tui().await
}

#[cfg(test)]
mod tests {
    use super::{first_positional, parse_api_url_flag, parse_upload_args};
    use crate::api::models::SensorKind;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_upload_args_reads_file_type_and_watch() {
        let args = argv(&[
            "ecovista",
            "upload",
            "--file",
            "lecturas.csv",
            "--sensor-type",
            "sonido",
            "--watch",
        ]);
        let parsed = parse_upload_args(&args, 2);
        assert_eq!(parsed.file, "lecturas.csv");
        assert_eq!(parsed.sensor_type, Some(SensorKind::Sound));
        assert!(parsed.watch);
        assert!(parsed.api_url.is_empty());
    }

    #[test]
    fn parse_upload_args_accepts_endpoint_alias() {
        let args = argv(&["ecovista", "upload", "-t", "air-quality", "-f", "a.csv"]);
        let parsed = parse_upload_args(&args, 2);
        assert_eq!(parsed.sensor_type, Some(SensorKind::AirQuality));
        assert_eq!(parsed.file, "a.csv");
        assert!(!parsed.watch);
    }

    #[test]
    fn parse_api_url_flag_reads_custom_url() {
        let args = argv(&["ecovista", "tui", "--api-url", "http://10.1.2.3:8070/api"]);
        assert_eq!(parse_api_url_flag(&args, 2), "http://10.1.2.3:8070/api");
    }

    #[test]
    fn first_positional_skips_flag_pairs() {
        let args = argv(&["ecovista", "status", "--api-url", "http://x", "abc-123"]);
        assert_eq!(first_positional(&args, 2).as_deref(), Some("abc-123"));
        let args = argv(&["ecovista", "status"]);
        assert_eq!(first_positional(&args, 2), None);
    }
}
