//! Infraestructura de logging
//!
//! tracing-subscriber con nivel configurable y fichero rotativo diario
//! opcional.

use std::path::Path;

/// Inicializa el logger
///
/// Con `log_dir` presente y existente, la salida va a un fichero rotativo
/// diario; en caso contrario, a stdout.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "fiesta-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
