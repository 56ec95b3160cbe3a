//! Host document field: text storage holding the serialized document.
//!
//! The field is read once when a form is opened and rewritten after every
//! edit. It is storage only; nothing here renders.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
    time::SystemTime,
};

use crate::form::FormError;

/// Read/write storage for the serialized document.
pub trait DocumentField {
    /// Read the current document text.
    fn load(&mut self) -> Result<String, FormError>;

    /// Replace the document text.
    fn store(&mut self, document: &str) -> Result<(), FormError>;
}

/// In-memory document field.
///
/// Clones made with [`MemoryField::handle`] share the same content, so the
/// text stays observable after the field is handed to a form.
#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    content: Rc<RefCell<String>>,
}

impl MemoryField {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Rc::new(RefCell::new(content.into())),
        }
    }

    /// Another view on the same content.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }
}

impl DocumentField for MemoryField {
    fn load(&mut self) -> Result<String, FormError> {
        Ok(self.content())
    }

    fn store(&mut self, document: &str) -> Result<(), FormError> {
        *self.content.borrow_mut() = document.to_string();
        Ok(())
    }
}

/// Document field backed by a file.
///
/// A missing file reads as an empty document. Storing the text the file
/// already holds is a no-op. Before the first real write over an existing
/// file a timestamped copy `<name>.bk-<secs>.<ext>` is kept.
#[derive(Debug, Clone)]
pub struct FileField {
    path: PathBuf,
    backup: bool,
    backed_up: bool,
    /// Last text read from or written to the file.
    on_disk: Option<String>,
}

impl FileField {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup: true,
            backed_up: false,
            on_disk: None,
        }
    }

    /// Disable the backup copy.
    pub fn without_backup(mut self) -> Self {
        self.backup = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> io::Result<PathBuf> {
        let ext = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("json");
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(io::Error::other)?
            .as_secs();
        Ok(self.path.with_extension(format!("bk-{secs}.{ext}")))
    }
}

impl DocumentField for FileField {
    fn load(&mut self) -> Result<String, FormError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                self.on_disk = Some(s.clone());
                Ok(s)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist, starting empty", self.path.display());
                self.on_disk = None;
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, document: &str) -> Result<(), FormError> {
        if self.on_disk.as_deref() == Some(document) {
            debug!("{} unchanged", self.path.display());
            return Ok(());
        }
        if self.backup && !self.backed_up && self.path.exists() {
            let backup = self.backup_path()?;
            fs::copy(&self.path, &backup)?;
            info!("backup written to {}", backup.display());
        }
        self.backed_up = true;
        fs::write(&self.path, document)?;
        self.on_disk = Some(document.to_string());
        Ok(())
    }
}
