//! View models for the HTML documents
//!
//! Each template struct owns exactly the values its `.html` file reads, already flattened
//! into display form. Askama escapes every interpolation, so user text never becomes markup.

use acuda_core::models::{AlarmConfirmation, GenericRecord, ImageAttachment, ReportRecord};
use askama::Template;

/// One checkbox of the alarm form
#[derive(Debug, Clone, PartialEq)]
pub struct CheckItem {
    pub label: &'static str,
    pub checked: bool,
    pub detail: Option<String>,
}

impl CheckItem {
    fn new(label: &'static str, flag: Option<bool>) -> Self {
        Self {
            label,
            checked: flag.unwrap_or(false),
            detail: None,
        }
    }

    fn with_detail(label: &'static str, flag: Option<bool>, detail: &Option<String>) -> Self {
        Self {
            detail: non_empty(detail),
            ..Self::new(label, flag)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

/// "Parte de respuesta de alarma", a single A4 page.
#[derive(Template, Debug)]
#[template(path = "parte_alarma.html")]
pub struct ReportTemplate {
    pub zonas: Option<String>,
    pub fecha: Option<String>,
    pub cliente: Option<String>,
    pub abonado: Option<String>,
    pub direccion: Option<String>,
    pub poblacion: Option<String>,
    pub motivo: Vec<CheckItem>,
    pub hora_aviso: Option<String>,
    pub hora_llegada_instalacion: Option<String>,
    pub situacion: Vec<CheckItem>,
    pub actuacion: Vec<CheckItem>,
    pub confirmada_si: bool,
    pub confirmada_no: bool,
    pub hora_fin: Option<String>,
    pub observaciones: Vec<String>,
    pub imagenes: Vec<String>,
    pub firma_vigilante: Option<String>,
    pub tip: Option<String>,
}

impl ReportTemplate {
    pub fn from_record(record: &ReportRecord) -> Self {
        let r = record;
        Self {
            zonas: non_empty(&r.zonas),
            fecha: non_empty(&r.fecha),
            cliente: non_empty(&r.cliente),
            abonado: non_empty(&r.abonado),
            direccion: non_empty(&r.direccion),
            poblacion: non_empty(&r.poblacion),
            motivo: vec![
                CheckItem::new("INTRUSIÓN", r.intrusion),
                CheckItem::new("INCENDIO", r.incendio),
                CheckItem::with_detail("OTRO:", r.otro, &r.otro_texto),
            ],
            hora_aviso: non_empty(&r.hora_aviso),
            hora_llegada_instalacion: non_empty(&r.hora_llegada_instalacion),
            situacion: vec![
                CheckItem::new("SIRENA", r.sirena),
                CheckItem::new("SE PERSONAN FF.CC.SS.", r.personal_ffcc),
                CheckItem::new("ZONA", r.zona),
                CheckItem::new("HAY PERSONAL DE LA EMPRESA", r.hay_personal),
                CheckItem::new("SIGNOS VIOLENCIA", r.signos_violencia),
                CheckItem::new("HAY CONTRATAS", r.contratas),
                CheckItem::new("PUERTAS ABIERTAS", r.puertas_abiertas),
                CheckItem::new("HAY PERSONAS AJENAS A LA EMPRESA", r.personas_ajenas),
                CheckItem::new("VENTANAS ABIERTAS", r.ventanas_abiertas),
                CheckItem::new("HAY HUMO O INDICIOS DE INCENDIO", r.humo_incendio),
                CheckItem::new("LUCES ENCENDIDAS", r.luces_encendidas),
                CheckItem::new("OTROS", r.otros_situacion),
            ],
            actuacion: vec![
                CheckItem::new("VERIFICACIÓN PERIMETRAL", r.verificacion_perimetral),
                CheckItem::new("TECLADO/CENTRALITA ALARMA", r.teclado_centralita),
                CheckItem::new("ACCESO AL RECINTO (VALLADO, ZONAS COMUNES)", r.acceso_recinto),
                CheckItem::new("SE RESETEA (RECONECTAR/REARMAR)", r.se_resetea),
                CheckItem::new("SE PERSONA PERSONAL DE LA EMPRESA", r.persona_empresa),
                CheckItem::new("SE ANULAN ZONAS", r.anulan_zonas),
                CheckItem::with_detail("SE REALIZA LLAMADA A:", r.llamada_a, &r.llamada_texto),
                CheckItem::new("SE SILENCIA", r.silencia),
                CheckItem::with_detail("SE ABRE INSTALACIÓN A:", r.abre_instalacion, &r.abre_texto),
                CheckItem::new("SE DESCONECTA ALARMA", r.desconecta_alarma),
                CheckItem::new("SE CIERRA INSTALACIÓN", r.cierra_instalacion),
                CheckItem::new("SE CONECTA ALARMA", r.conecta_alarma),
                CheckItem::new("PERSONA IDENTIFICADA", r.persona_identificada),
                CheckItem::with_detail("OTRAS:", r.otras_actuacion, &r.otras_texto),
                CheckItem::with_detail("NIE/DNI PERSONA ID.", r.nie_dni_persona, &r.nie_dni_texto),
                CheckItem::new("PRUEBAS GRÁFICAS (FOTOS)", r.pruebas_graficas),
            ],
            confirmada_si: r.alarma_confirmada == Some(AlarmConfirmation::Si),
            confirmada_no: r.alarma_confirmada == Some(AlarmConfirmation::No),
            hora_fin: non_empty(&r.hora_fin),
            observaciones: r
                .observaciones
                .as_deref()
                .map(|text| text.lines().map(str::to_string).collect())
                .unwrap_or_default(),
            // Anything else could make the browser fetch a remote or local resource
            imagenes: r
                .imagenes
                .iter()
                .filter(|src| src.starts_with("data:image/"))
                .cloned()
                .collect(),
            firma_vigilante: non_empty(&r.firma_vigilante),
            tip: non_empty(&r.tip),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldItem {
    pub label: &'static str,
    pub value: String,
    pub full_width: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub src: String,
    pub name: String,
}

/// Generic "Documento Personalizado"
#[derive(Template, Debug)]
#[template(path = "documento.html")]
pub struct DocumentTemplate {
    pub items: Vec<FieldItem>,
    pub fecha: String,
    pub images: Vec<ImageItem>,
    pub generated_at: String,
}

impl DocumentTemplate {
    pub fn from_record(
        record: &GenericRecord,
        images: &[ImageAttachment],
        generated_at: String,
    ) -> Self {
        let fields: [(&'static str, &Option<String>, bool); 7] = [
            ("Nombre", &record.nombre, false),
            ("Apellidos", &record.apellidos, false),
            ("Email", &record.email, false),
            ("Teléfono", &record.telefono, false),
            ("Empresa", &record.empresa, false),
            ("Cargo", &record.cargo, false),
            ("Dirección", &record.direccion, true),
        ];

        let items = fields
            .into_iter()
            .filter_map(|(label, value, full_width)| {
                non_empty(value).map(|value| FieldItem {
                    label,
                    value,
                    full_width,
                })
            })
            .collect();

        let images = images
            .iter()
            .map(|image| ImageItem {
                src: image.to_data_uri(),
                name: if image.filename.trim().is_empty() {
                    "Imagen".to_string()
                } else {
                    image.filename.clone()
                },
            })
            .collect();

        Self {
            items,
            fecha: record
                .fecha
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(acuda_core::locale::today_es),
            images,
            generated_at,
        }
    }
}
