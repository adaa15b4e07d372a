//! Servicios auxiliares
//!
//! - [`MailerService`] - correo transaccional best-effort
//! - [`ImageStore`] - almacenamiento de imágenes de producto

pub mod images;
pub mod mailer;

pub use images::ImageStore;
pub use mailer::{EmailOutcome, MailerService};
