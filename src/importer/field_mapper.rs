// ==========================================
// Asset import - field normalizer
// ==========================================
// Role: source columns → canonical fields through ordered alias lists
// Lookup: exact header first, then case-insensitive; a blank cell falls
//         through to the next alias
// ==========================================

use crate::config::CategoryProfile;
use crate::domain::{CanonicalAssetRecord, CellValue, RawRow};
use crate::importer::asset_importer_trait::{DataCleaner as _, FieldNormalizer};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::identity_allocator::SequenceCounter;

// ==========================================
// Alias table (Spanish, unaccented Spanish, English)
// ==========================================
pub mod aliases {
    pub const INTERNAL_ID: &[&str] = &["ID Interno", "internal_id"];
    pub const BARCODE_ID: &[&str] = &["Código de Barra", "Codigo de Barra", "barcode_id"];
    pub const NAME: &[&str] = &["Nombre", "name"];
    pub const DESCRIPTION: &[&str] = &["Descripción", "Descripcion", "description"];
    pub const FUNCTIONAL_DESCRIPTION: &[&str] = &[
        "Descripción Funcional",
        "Descripcion Funcional",
        "functional_description",
    ];
    pub const COMPLEMENTARY_DESCRIPTION: &[&str] = &[
        "Descripción Complementaria",
        "Descripcion Complementaria",
        "complementary_description",
    ];
    pub const BRAND: &[&str] = &["Marca", "brand"];
    pub const MODEL: &[&str] = &["Modelo", "model"];
    pub const SERIAL_NUMBER: &[&str] =
        &["Número de Serie", "Numero de Serie", "N° Serie", "serial_number"];
    pub const STATUS: &[&str] = &["Estado", "status"];
    pub const LOCATION: &[&str] = &["Ubicación", "Ubicacion", "location"];
    pub const OWNERSHIP: &[&str] = &["Propiedad", "Tipo de Propiedad", "ownership"];
    pub const RESPONSIBLE: &[&str] = &["Responsable", "responsible"];
    pub const ASSIGNED_TO: &[&str] = &["Asignado a", "assigned_to"];
    pub const ACCOUNTING_ACCOUNT: &[&str] = &["Cuenta Contable", "accounting_account"];
    pub const TTI: &[&str] = &["TTI", "tti"];
    pub const REMAINING_USEFUL_LIFE: &[&str] = &[
        "Vida Útil Restante",
        "Vida Util Restante",
        "remaining_useful_life",
    ];
    pub const HOURS: &[&str] = &["Horas", "Horómetro", "Horometro", "hours"];
    pub const DAILY_RATE: &[&str] = &["Tarifa Diaria", "daily_rate"];
    pub const VALUE: &[&str] = &["Valor", "value"];
    pub const YEAR: &[&str] = &["Año", "Ano", "year"];
    pub const ORIGIN_YEAR: &[&str] = &["Año de Origen", "Ano de Origen", "origin_year"];
    pub const INSURANCE: &[&str] = &["Seguro", "insurance"];
    pub const INSURANCE_EXPIRY: &[&str] = &["Vencimiento Seguro", "insurance_expiry"];
    pub const DOMAIN_NUMBER: &[&str] = &["Dominio", "Patente", "domain_number"];
    pub const ENGINE_NUMBER: &[&str] = &["Número de Motor", "Numero de Motor", "engine_number"];
    pub const CHASSIS_NUMBER: &[&str] =
        &["Número de Chasis", "Numero de Chasis", "chassis_number"];
    pub const PROCESSOR: &[&str] = &["Procesador", "processor"];
    pub const RAM: &[&str] = &["Memoria RAM", "RAM", "ram"];
    pub const STORAGE: &[&str] = &["Almacenamiento", "Disco", "storage"];
    pub const IMAGE_URL: &[&str] = &["Imagen", "image_url"];

    /// Canonical field name → alias list
    pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
        ("internal_id", INTERNAL_ID),
        ("barcode_id", BARCODE_ID),
        ("name", NAME),
        ("description", DESCRIPTION),
        ("functional_description", FUNCTIONAL_DESCRIPTION),
        ("complementary_description", COMPLEMENTARY_DESCRIPTION),
        ("brand", BRAND),
        ("model", MODEL),
        ("serial_number", SERIAL_NUMBER),
        ("status", STATUS),
        ("location", LOCATION),
        ("ownership", OWNERSHIP),
        ("responsible", RESPONSIBLE),
        ("assigned_to", ASSIGNED_TO),
        ("accounting_account", ACCOUNTING_ACCOUNT),
        ("tti", TTI),
        ("remaining_useful_life", REMAINING_USEFUL_LIFE),
        ("hours", HOURS),
        ("daily_rate", DAILY_RATE),
        ("value", VALUE),
        ("year", YEAR),
        ("origin_year", ORIGIN_YEAR),
        ("insurance", INSURANCE),
        ("insurance_expiry", INSURANCE_EXPIRY),
        ("domain_number", DOMAIN_NUMBER),
        ("engine_number", ENGINE_NUMBER),
        ("chassis_number", CHASSIS_NUMBER),
        ("processor", PROCESSOR),
        ("ram", RAM),
        ("storage", STORAGE),
        ("image_url", IMAGE_URL),
    ];

    /// First alias of a canonical field (template header)
    pub fn primary_alias(field: &str) -> Option<&'static str> {
        FIELD_ALIASES
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, list)| list.first().copied())
    }
}

/// First non-blank cell among `aliases`, in priority order
///
/// Exact header match first, then case-insensitive by column position
pub fn lookup<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a CellValue> {
    for alias in aliases {
        let cell = row.get(alias).or_else(|| {
            let wanted = alias.to_lowercase();
            row.iter_columns()
                .find(|(header, _)| header.trim().to_lowercase() == wanted)
                .map(|(_, value)| value)
        });

        if let Some(value) = cell {
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn get_string(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        lookup(row, aliases).and_then(|v| self.cleaner.clean_text(v))
    }

    fn get_number(&self, row: &RawRow, aliases: &[&str]) -> Option<f64> {
        lookup(row, aliases).and_then(|v| self.cleaner.coerce_number(v))
    }

    fn get_year(&self, row: &RawRow, aliases: &[&str]) -> Option<i32> {
        lookup(row, aliases).and_then(|v| self.cleaner.coerce_year(v))
    }

    /// functional description + brand + model, else the name column, else `Activo {id}`
    fn build_name(
        functional_description: Option<&str>,
        brand: Option<&str>,
        model: Option<&str>,
        explicit_name: Option<String>,
        internal_id: &str,
    ) -> String {
        let composed = [functional_description, brand, model]
            .iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !composed.is_empty() {
            composed
        } else if let Some(name) = explicit_name {
            name
        } else {
            format!("Activo {}", internal_id)
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for FieldMapper {
    fn normalize(
        &self,
        row: &RawRow,
        profile: &CategoryProfile,
        counter: &mut SequenceCounter,
    ) -> CanonicalAssetRecord {
        // identifier
        let (internal_id, auto_assigned_id) = match self.explicit_internal_id(row) {
            Some(id) => (id, false),
            None => (counter.next_id(), true),
        };

        let barcode_id = self
            .cleaner
            .clean_barcode(self.get_string(row, aliases::BARCODE_ID));
        let status = self
            .cleaner
            .normalize_status(self.get_string(row, aliases::STATUS), &profile.default_status);

        let functional_description = self.get_string(row, aliases::FUNCTIONAL_DESCRIPTION);
        let brand = self.get_string(row, aliases::BRAND);
        let model = self.get_string(row, aliases::MODEL);
        let name = Self::build_name(
            functional_description.as_deref(),
            brand.as_deref(),
            model.as_deref(),
            self.get_string(row, aliases::NAME),
            &internal_id,
        );

        CanonicalAssetRecord {
            internal_id,
            barcode_id,
            name,

            description: self.get_string(row, aliases::DESCRIPTION),
            functional_description,
            complementary_description: self.get_string(row, aliases::COMPLEMENTARY_DESCRIPTION),
            brand,
            model,
            serial_number: self.get_string(row, aliases::SERIAL_NUMBER),

            status,
            location: self
                .get_string(row, aliases::LOCATION)
                .unwrap_or_else(|| profile.default_location.clone()),
            ownership: self
                .get_string(row, aliases::OWNERSHIP)
                .unwrap_or_else(|| profile.default_ownership.clone()),
            responsible: self
                .get_string(row, aliases::RESPONSIBLE)
                .unwrap_or_else(|| profile.default_responsible.clone()),
            assigned_to: self.get_string(row, aliases::ASSIGNED_TO),

            value: self.get_number(row, aliases::VALUE),
            accounting_account: self.get_string(row, aliases::ACCOUNTING_ACCOUNT),
            tti: self.get_number(row, aliases::TTI),
            remaining_useful_life: self.get_number(row, aliases::REMAINING_USEFUL_LIFE),
            hours: self.get_number(row, aliases::HOURS),
            daily_rate: self.get_number(row, aliases::DAILY_RATE),
            year: self.get_year(row, aliases::YEAR),
            origin_year: self.get_year(row, aliases::ORIGIN_YEAR),
            insurance: self.get_string(row, aliases::INSURANCE),
            insurance_expiry: self.get_string(row, aliases::INSURANCE_EXPIRY),

            domain_number: self.get_string(row, aliases::DOMAIN_NUMBER),
            engine_number: self.get_string(row, aliases::ENGINE_NUMBER),
            chassis_number: self.get_string(row, aliases::CHASSIS_NUMBER),

            processor: self.get_string(row, aliases::PROCESSOR),
            ram: self.get_string(row, aliases::RAM),
            storage: self.get_string(row, aliases::STORAGE),

            image_url: Some(
                self.get_string(row, aliases::IMAGE_URL)
                    .unwrap_or_else(|| profile.default_image.clone()),
            ),

            row_number: row.row_number,
            auto_assigned_id,
        }
    }

    fn explicit_internal_id(&self, row: &RawRow) -> Option<String> {
        self.get_string(row, aliases::INTERNAL_ID)
    }
}
