//! Modelos de base de datos
//!
//! Un fichero por entidad. Los IDs usan `RecordId` serializado como
//! `"tabla:id"` mediante [`serde_helpers`].

pub mod serde_helpers;

pub mod cliente;
pub mod codigo_verificacion;
pub mod pedido;
pub mod producto;
pub mod usuario;
pub mod venta;

pub use cliente::{
    Cliente, ClienteCreate, ClienteId, ClienteUpdate, EstadisticasCliente, FRECUENTE_THRESHOLD,
    Preferencias, TipoCliente,
};
pub use codigo_verificacion::{CodigoVerificacion, MAX_INTENTOS, generar_codigo};
pub use pedido::{
    CambioEstadoRequest, CancelacionPublica, DatosCliente, EstadoPedido, Pedido, PedidoCreate,
    PedidoId, PedidoItem, PedidoItemRequest,
};
pub use producto::{
    CategoriaProducto, DetalleGlobo, Producto, ProductoCreate, ProductoId, ProductoUpdate,
};
pub use usuario::{Usuario, UsuarioId, UsuarioUpdate};
pub use venta::{
    ClienteOcasional, EstadoVenta, MetodoPago, ServicioAdicional, Venta, VentaCreate, VentaId,
    VentaItem, VentaItemRequest,
};
