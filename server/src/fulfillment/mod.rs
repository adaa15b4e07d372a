//! Motor de cumplimiento
//!
//! Ciclo de vida de ventas y pedidos: validación de carrito, numeración
//! visible, códigos de seguimiento, descuento condicional de stock con
//! compensación, máquinas de estado y estadísticas de cliente.

pub mod carrito;
pub mod numbering;
pub mod pedidos;
pub mod ventas;

pub use carrito::{LineaSolicitada, LineaValidada};
pub use numbering::{formato_numero, generar_codigo_seguimiento};
pub use pedidos::PedidoService;
pub use ventas::VentaService;
