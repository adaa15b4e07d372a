//! Almacenamiento de imágenes de producto
//!
//! Las subidas se validan, se reencodan a JPEG y se guardan bajo
//! `work_dir/uploads/images` con nombre UUID. El borrado de un producto
//! elimina su fichero.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use shared::AppError;

/// Tamaño máximo de fichero (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Formatos aceptados en la subida
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Calidad JPEG tras el reencodado
const JPEG_QUALITY: u8 = 85;

#[derive(Clone, Debug)]
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    /// Valida, comprime y persiste una imagen; devuelve el nombre de fichero
    pub fn save(&self, data: &[u8], original_name: &str) -> Result<String, AppError> {
        let ext = PathBuf::from(original_name)
            .extension()
            .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
            .ok_or_else(|| {
                AppError::validation(format!("Extensión inválida: {}", original_name))
            })?;

        validate_image(data, &ext)?;
        let compressed = compress_to_jpeg(data)?;

        fs::create_dir_all(&self.images_dir).map_err(|e| {
            AppError::internal(format!("No se pudo crear el directorio de imágenes: {}", e))
        })?;

        let filename = format!("{}.jpg", Uuid::new_v4());
        let path = self.images_dir.join(&filename);
        fs::write(&path, &compressed)
            .map_err(|e| AppError::internal(format!("No se pudo guardar la imagen: {}", e)))?;

        tracing::info!(
            original_name = %original_name,
            filename = %filename,
            size = compressed.len(),
            "Imagen guardada"
        );
        Ok(filename)
    }

    /// Ruta absoluta de una imagen guardada; rechaza nombres con rutas
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
            return Err(AppError::validation("Nombre de imagen inválido"));
        }
        let path = self.images_dir.join(filename);
        if !path.is_file() {
            return Err(AppError::not_found("Imagen"));
        }
        Ok(path)
    }

    /// Elimina el fichero si existe; la ausencia no es error
    pub fn delete(&self, filename: &str) {
        if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
            return;
        }
        let path = self.images_dir.join(filename);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(filename = %filename, "No se pudo borrar la imagen: {}", e);
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.images_dir
    }
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Fichero vacío"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "Fichero demasiado grande; máximo {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Formato '{}' no soportado; aceptados: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!("Imagen inválida: {}", e)));
    }
    Ok(())
}

fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Imagen inválida: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("No se pudo comprimir la imagen: {}", e)))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rechaza_extension_desconocida() {
        let err = validate_image(&[1, 2, 3], "gif").unwrap_err();
        assert!(err.message.contains("no soportado"));
    }

    #[test]
    fn test_rechaza_fichero_vacio() {
        assert!(validate_image(&[], "png").is_err());
    }

    #[test]
    fn test_resolve_rechaza_rutas() {
        let store = ImageStore::new(PathBuf::from("/tmp/fiesta-test-images"));
        assert!(store.resolve("../secreto.jpg").is_err());
        assert!(store.resolve("a/b.jpg").is_err());
    }
}
