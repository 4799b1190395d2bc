use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether the alarm was confirmed on site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlarmConfirmation {
    Si,
    No,
}

/// Form data of a "parte de respuesta de alarma".
///
/// Every field is optional. Absent text fields are left blank in the rendered form and absent
/// flags render as unchecked boxes. The record is never persisted; only the resulting PDF is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    // Datos básicos
    pub zonas: Option<String>,
    pub fecha: Option<String>,
    pub cliente: Option<String>,
    pub abonado: Option<String>,
    pub direccion: Option<String>,
    pub poblacion: Option<String>,

    // Motivo aviso
    pub intrusion: Option<bool>,
    pub incendio: Option<bool>,
    pub otro: Option<bool>,
    pub otro_texto: Option<String>,

    // Horarios
    pub hora_aviso: Option<String>,
    pub hora_llegada_instalacion: Option<String>,
    pub hora_fin: Option<String>,

    // Situación
    pub sirena: Option<bool>,
    pub personal_ffcc: Option<bool>,
    pub zona: Option<bool>,
    pub hay_personal: Option<bool>,
    pub signos_violencia: Option<bool>,
    pub contratas: Option<bool>,
    pub puertas_abiertas: Option<bool>,
    pub personas_ajenas: Option<bool>,
    pub ventanas_abiertas: Option<bool>,
    pub humo_incendio: Option<bool>,
    pub luces_encendidas: Option<bool>,
    pub otros_situacion: Option<bool>,

    // Actuación
    pub verificacion_perimetral: Option<bool>,
    pub teclado_centralita: Option<bool>,
    pub acceso_recinto: Option<bool>,
    pub se_resetea: Option<bool>,
    pub persona_empresa: Option<bool>,
    pub anulan_zonas: Option<bool>,
    pub llamada_a: Option<bool>,
    pub llamada_texto: Option<String>,
    pub silencia: Option<bool>,
    pub abre_instalacion: Option<bool>,
    pub abre_texto: Option<String>,
    pub desconecta_alarma: Option<bool>,
    pub cierra_instalacion: Option<bool>,
    pub conecta_alarma: Option<bool>,
    pub persona_identificada: Option<bool>,
    pub otras_actuacion: Option<bool>,
    pub otras_texto: Option<String>,
    pub nie_dni_persona: Option<bool>,
    pub nie_dni_texto: Option<String>,
    pub pruebas_graficas: Option<bool>,

    // Cierre
    pub alarma_confirmada: Option<AlarmConfirmation>,
    pub observaciones: Option<String>,
    /// Images as `data:image/<subtype>;base64,...` URIs, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imagenes: Vec<String>,
    pub firma_vigilante: Option<String>,
    pub tip: Option<String>,
}

impl ReportRecord {
    /// True when at least one form field or one image was supplied.
    pub fn has_content(&self) -> bool {
        if !self.imagenes.is_empty() {
            return true;
        }
        // Every remaining field is an Option, so the serialized form has a non-null value
        // exactly when a field was supplied.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.values().any(|v| !v.is_null()),
            _ => false,
        }
    }

    /// Fill `fecha` with today's date when the caller left it out.
    pub fn with_default_date(mut self) -> Self {
        if self.fecha.as_deref().map_or(true, str::is_empty) {
            self.fecha = Some(crate::locale::today_es());
        }
        self
    }

    /// Fixed data used by the example endpoint.
    pub fn sample() -> Self {
        ReportRecord {
            zonas: Some("A1, A2, B3".to_string()),
            fecha: Some(crate::locale::today_es()),
            cliente: Some("EMPRESA EJEMPLO S.L.".to_string()),
            abonado: Some("123456".to_string()),
            direccion: Some("Calle Principal 123".to_string()),
            poblacion: Some("Madrid".to_string()),
            intrusion: Some(true),
            hora_aviso: Some("14:30".to_string()),
            hora_llegada_instalacion: Some("14:45".to_string()),
            sirena: Some(true),
            personal_ffcc: Some(false),
            zona: Some(true),
            puertas_abiertas: Some(true),
            verificacion_perimetral: Some(true),
            se_resetea: Some(true),
            alarma_confirmada: Some(AlarmConfirmation::No),
            hora_fin: Some("15:15".to_string()),
            observaciones: Some(
                "Falsa alarma causada por fuerte viento que activó sensor de vibración en puerta \
                 principal. No se detectaron signos de intrusión."
                    .to_string(),
            ),
            firma_vigilante: Some("Juan Pérez".to_string()),
            tip: Some("001".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_no_content() {
        let record: ReportRecord = serde_json::from_str("{}").unwrap();
        assert!(!record.has_content());
    }

    #[test]
    fn test_single_flag_counts_as_content() {
        let record: ReportRecord = serde_json::from_str(r#"{"sirena": false}"#).unwrap();
        assert!(record.has_content());
    }

    #[test]
    fn test_images_alone_count_as_content() {
        let record = ReportRecord {
            imagenes: vec!["data:image/png;base64,AAAA".to_string()],
            ..Default::default()
        };
        assert!(record.has_content());
    }

    #[test]
    fn test_camel_case_field_names() {
        let record: ReportRecord = serde_json::from_str(
            r#"{"horaLlegadaInstalacion": "14:45", "nieDniTexto": "X123", "alarmaConfirmada": "si"}"#,
        )
        .unwrap();
        assert_eq!(record.hora_llegada_instalacion.as_deref(), Some("14:45"));
        assert_eq!(record.nie_dni_texto.as_deref(), Some("X123"));
        assert_eq!(record.alarma_confirmada, Some(AlarmConfirmation::Si));
    }

    #[test]
    fn test_default_date_keeps_supplied_value() {
        let record = ReportRecord {
            fecha: Some("1/1/2026".to_string()),
            ..Default::default()
        }
        .with_default_date();
        assert_eq!(record.fecha.as_deref(), Some("1/1/2026"));

        let filled = ReportRecord::default().with_default_date();
        assert!(filled.fecha.is_some());
    }

    #[test]
    fn test_sample_record() {
        let sample = ReportRecord::sample();
        assert!(sample.has_content());
        assert_eq!(sample.cliente.as_deref(), Some("EMPRESA EJEMPLO S.L."));
        assert_eq!(sample.alarma_confirmada, Some(AlarmConfirmation::No));
    }
}
