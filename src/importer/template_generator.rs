// ==========================================
// Asset import - template generator
// ==========================================
// Role: header-only workbook per category
// Headers: primary alias of every schema field, in schema order
// Tooling: rust_xlsxwriter
// ==========================================

use crate::domain::AssetCategory;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::aliases;
use crate::importer::schema_mapper::schema_fields;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

pub const TEMPLATE_SHEET_NAME: &str = "Plantilla";

pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Header labels for a category
    pub fn headers(category: AssetCategory) -> ImportResult<Vec<&'static str>> {
        schema_fields(category)
            .iter()
            .map(|field| {
                aliases::primary_alias(field).ok_or_else(|| {
                    ImportError::TemplateError(format!("campo sin alias: {}", field))
                })
            })
            .collect()
    }

    /// Build the xlsx bytes
    pub fn generate(&self, category: AssetCategory) -> ImportResult<Vec<u8>> {
        let headers = Self::headers(category)?;

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(TEMPLATE_SHEET_NAME)?;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *header, &header_format)?;
            worksheet.set_column_width(col, (header.chars().count() + 4).max(12) as f64)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        let bytes = workbook.save_to_buffer()?;
        Ok(bytes)
    }

    /// Write the template to disk
    pub fn write_to(&self, category: AssetCategory, out: &Path) -> ImportResult<usize> {
        let bytes = self.generate(category)?;
        std::fs::write(out, &bytes)?;
        info!(
            category = %category,
            path = %out.display(),
            columns = schema_fields(category).len(),
            "plantilla generada"
        );
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::asset_importer_trait::FileParser;
    use crate::importer::file_parser::ExcelParser;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Cursor;

    #[test]
    fn test_headers_use_primary_alias() {
        let headers = TemplateGenerator::headers(AssetCategory::Vehicles).unwrap();

        assert_eq!(headers[0], "ID Interno");
        assert!(headers.contains(&"Número de Chasis"));
        assert!(headers.contains(&"Dominio"));
        assert!(!headers.contains(&"Patente"));
    }

    #[test]
    fn test_furniture_template_has_no_type_column() {
        let headers = TemplateGenerator::headers(AssetCategory::Furniture).unwrap();
        assert!(!headers.contains(&"type"));
        assert!(!headers.contains(&"Número de Chasis"));
    }

    #[test]
    fn test_generated_workbook_has_single_header_row() {
        let bytes = TemplateGenerator.generate(AssetCategory::ITEquipment).unwrap();

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![TEMPLATE_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.height(), 1);
        assert_eq!(
            range.width(),
            TemplateGenerator::headers(AssetCategory::ITEquipment).unwrap().len()
        );

        // header only: nothing to import
        assert!(ExcelParser.parse_bytes(&bytes).unwrap().is_empty());
    }
}
