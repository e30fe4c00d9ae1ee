use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::models::TaskState;
use crate::api::{ApiClient, StatusSource};
use crate::core::config;
use crate::core::terminal::{GuideSection, print_error, print_info, print_success, print_warn};
use crate::poller::{self, PollEvent};

use super::UploadArgs;

/// Headless counterpart of the operations screen: submit a CSV, optionally
/// stay and poll the task to completion.
pub async fn run_upload(args: UploadArgs) -> Result<()> {
    if args.file.is_empty() {
        // Validation failures never reach the network.
        print_error("Por favor, selecciona un archivo.");
        return Ok(());
    }
    let Some(kind) = args.sensor_type else {
        print_error("Tipo de sensor inválido. Usa: calidad_aire, sonido o soterrado.");
        return Ok(());
    };
    if !Path::new(&args.file).exists() {
        print_error(&format!("El archivo {} no existe.", args.file));
        return Ok(());
    }

    let client = ApiClient::new(config::resolve_api_url(&args.api_url));
    let ack = match client.submit_upload(Path::new(&args.file), kind).await {
        Ok(ack) => ack,
        Err(e) => {
            print_error(&format!("{}", e));
            return Ok(());
        }
    };

    GuideSection::new("Carga aceptada")
        .status("Archivo", &args.file)
        .status("Tipo de sensor", kind.label())
        .status("Tarea", &ack.task_id)
        .print();

    if !args.watch {
        print_info(&format!(
            "Sigue el progreso con: ecovista status {}",
            ack.task_id
        ));
        return Ok(());
    }

    watch_task(Arc::new(client), ack.task_id).await
}

/// Poll a task until its terminal state, printing each transition.
async fn watch_task(source: Arc<dyn StatusSource>, task_id: String) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(16);
    let _handle = poller::spawn(source, task_id, tx);

    while let Some(event) = rx.recv().await {
        match event {
            PollEvent::Update(record) => {
                print_info(&format!("Tarea {}: {}", record.task_id, record.state.as_str()));
            }
            PollEvent::Completed(record) => match record.state {
                TaskState::Success => {
                    let result = record.result.unwrap_or_else(|| {
                        crate::api::models::TaskResult {
                            message: "Tarea completada.".to_string(),
                            collection: "desconocida".to_string(),
                        }
                    });
                    print_success(&format!(
                        "{} (colección: {})",
                        result.message, result.collection
                    ));
                }
                TaskState::Failure => {
                    print_error(&format!("La tarea {} ha fallado.", record.task_id));
                }
                TaskState::FetchError => {
                    print_warn(&format!(
                        "No se pudo consultar la tarea {}; se detiene el monitoreo.",
                        record.task_id
                    ));
                }
                TaskState::Pending => {}
            },
        }
    }
    Ok(())
}

/// One-shot status query, no polling.
pub async fn run_status(task_id: &str, api_url: String) -> Result<()> {
    let client = ApiClient::new(api_url);
    let status = match client.task_status(task_id).await {
        Ok(status) => status,
        Err(e) => {
            print_error(&format!("No se pudo consultar la tarea: {}", e));
            return Ok(());
        }
    };

    let mut section = GuideSection::new("Estado de la Tarea")
        .status("API", client.base_url())
        .status("Tarea", task_id)
        .status("Estado", status.state.as_str());
    if let Some(result) = status.result {
        section = section
            .status("Mensaje", &result.message)
            .status("Colección", &result.collection);
    }
    section.print();
    Ok(())
}
