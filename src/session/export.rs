use super::core::AnnotationSession;
use super::types::{Notice, SessionError};
use crate::draw::Surface;
use crate::export::{
    self, DocumentLayout, ExportArtifact, ExportError, ExportKind, FooterFields, Message,
};
use chrono::{Local, NaiveDate};
use log::{error, info};

impl AnnotationSession {
    /// Merges the background and annotation layer into a new raster.
    ///
    /// Never touches the live surface or history.
    pub fn flatten(&mut self) -> Result<Surface, SessionError> {
        self.require_form()?;
        self.flatten_layers()
            .map_err(|err| self.export_failed(err, "Failed to flatten form"))
    }

    /// Flattened form as a PNG download.
    pub fn export_as_image(&mut self) -> Result<ExportArtifact, SessionError> {
        self.require_form()?;
        let artifact = self
            .build_image()
            .map_err(|err| self.export_failed(err, "Failed to save PNG"))?;
        self.exported(&artifact, "Form saved as PNG");
        Ok(artifact)
    }

    /// Flattened form on a single PDF page with the subject footer.
    pub fn export_as_document(&mut self) -> Result<ExportArtifact, SessionError> {
        self.require_form()?;
        let artifact = self
            .build_document()
            .map_err(|err| self.export_failed(err, "Failed to save PDF"))?;
        self.exported(&artifact, "Form saved as PDF");
        Ok(artifact)
    }

    /// Print-preview page that opens the print dialog when loaded.
    pub fn print(&mut self) -> Result<ExportArtifact, SessionError> {
        self.require_form()?;
        let artifact = self
            .build_print()
            .map_err(|err| self.export_failed(err, "Failed to prepare print"))?;
        self.exported(&artifact, "Print job prepared");
        Ok(artifact)
    }

    /// Fills `template` for the subject and active form.
    ///
    /// The raster is not part of the message.
    pub fn compose_message(&mut self, template: &str) -> Result<Message, SessionError> {
        self.require_form()?;
        let form_name = self.form_name();
        let message = export::compose_message(
            template,
            &self.subject,
            &form_name,
            &self.options.handoff_base_url,
        )
        .map_err(|err| self.export_failed(err, "Failed to prepare message"))?;

        info!("Composed message for '{}'", form_name);
        self.push_notice(Notice::success("Message ready"));
        Ok(message)
    }

    /// [`compose_message`](Self::compose_message) with the configured template.
    pub fn compose_default_message(&mut self) -> Result<Message, SessionError> {
        let template = self.options.message_template.clone();
        self.compose_message(&template)
    }

    fn flatten_layers(&self) -> Result<Surface, ExportError> {
        let layers = self
            .layers
            .as_ref()
            .ok_or_else(|| ExportError::Document("no active form".into()))?;
        export::flatten(&layers.background, &layers.surface)
    }

    fn build_image(&self) -> Result<ExportArtifact, ExportError> {
        let bytes = self.flatten_layers()?.to_png_bytes()?;
        Ok(self.artifact(ExportKind::Image, bytes))
    }

    fn build_document(&self) -> Result<ExportArtifact, ExportError> {
        let flat = self.flatten_layers()?;
        let layout = DocumentLayout {
            page_width_mm: self.options.page_width_mm,
            footer_font_size: self.options.footer_font_size,
            font: self.options.font.clone(),
        };
        let bytes = export::render_document(&flat, &self.footer()?, &layout)?;
        Ok(self.artifact(ExportKind::Document, bytes))
    }

    fn build_print(&self) -> Result<ExportArtifact, ExportError> {
        let png = self.flatten_layers()?.to_png_bytes()?;
        let html = export::render_print_html(&self.form_name(), &self.footer()?, &png);
        Ok(self.artifact(ExportKind::Print, html.into_bytes()))
    }

    fn artifact(&self, kind: ExportKind, bytes: Vec<u8>) -> ExportArtifact {
        ExportArtifact {
            kind,
            filename: export::export_filename(
                &self.subject,
                &self.form_name(),
                self.export_day(),
                kind,
            ),
            bytes,
        }
    }

    fn footer(&self) -> Result<FooterFields, ExportError> {
        FooterFields::new(&self.subject, self.export_day(), &self.options.date_format)
    }

    fn form_name(&self) -> String {
        self.form
            .as_ref()
            .map(|form| form.name.clone())
            .unwrap_or_default()
    }

    fn export_day(&self) -> NaiveDate {
        self.export_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn exported(&mut self, artifact: &ExportArtifact, message: &str) {
        info!(
            "Prepared {} ({} bytes)",
            artifact.filename,
            artifact.bytes.len()
        );
        self.push_notice(Notice::success(message));
    }

    fn export_failed(&mut self, err: ExportError, message: &str) -> SessionError {
        error!("{}: {}", message, err);
        self.push_notice(Notice::error(message));
        SessionError::Export(err)
    }
}
