//! Import template generation.
//!
//! Produces the workbook administrators fill in: a "Estudiantes" sheet with
//! the expected headers and one example row, and an "Instrucciones" sheet
//! describing each field.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::modules::import::normalizer::HEADER_DICTIONARY;

/// Field-by-field guidance shown on the instructions sheet:
/// (field, description, required, format/options).
const FIELD_GUIDE: &[(&str, &str, &str, &str)] = &[
    ("Nombre", "Nombre del estudiante", "Sí", "Texto"),
    ("Apellidos", "Apellidos del estudiante", "Sí", "Texto"),
    ("Correo Electrónico", "Correo único del estudiante", "Sí", "correo@ejemplo.com"),
    ("Fecha de Nacimiento", "Fecha de nacimiento del estudiante", "Sí", "DD/MM/AAAA"),
    ("Número de Documento", "DNI o documento de identidad", "No", "Texto"),
    ("Teléfono", "Teléfono del estudiante", "No", "Texto"),
    ("Dirección", "Dirección del estudiante", "No", "Texto"),
    (
        "Número de Matrícula",
        "Se genera automáticamente si se deja vacío",
        "No",
        "MW-AAAA-NNNN",
    ),
    ("Nivel Educativo", "Nombre del nivel, tal como está registrado", "No", "Texto"),
    ("Curso", "Nombre del curso, tal como está registrado", "No", "Texto"),
    ("Nombre del Contacto", "Nombre del contacto principal", "Sí", "Texto"),
    ("Apellidos del Contacto", "Apellidos del contacto principal", "Sí", "Texto"),
    ("Correo del Contacto", "Correo único del contacto principal", "Sí", "correo@ejemplo.com"),
    ("Teléfono del Contacto", "Teléfono del contacto principal", "No", "Texto"),
    ("Ocupación del Contacto", "Ocupación del contacto principal", "No", "Texto"),
    ("Parentesco", "Relación de la familia con el estudiante", "Sí", "padre / madre / tutor / otro"),
    ("¿Tiene Segundo Contacto?", "Indica si hay un segundo contacto", "No", "Sí / No"),
    ("Nombre del Segundo Contacto", "Nombre del segundo contacto", "No", "Texto"),
    ("Apellidos del Segundo Contacto", "Apellidos del segundo contacto", "No", "Texto"),
    ("Correo del Segundo Contacto", "Correo único del segundo contacto", "No", "correo@ejemplo.com"),
    ("Teléfono del Segundo Contacto", "Teléfono del segundo contacto", "No", "Texto"),
];

const EXAMPLE_ROW: &[&str] = &[
    "Ana",
    "Ruiz García",
    "ana.ruiz@ejemplo.com",
    "15/03/2015",
    "12345678A",
    "600111222",
    "Calle Mayor 1, Madrid",
    "",
    "Educación Primaria",
    "1º de Primaria",
    "Luis",
    "Ruiz Pérez",
    "luis.ruiz@ejemplo.com",
    "600333444",
    "Ingeniero",
    "padre",
    "Sí",
    "María",
    "García López",
    "maria.garcia@ejemplo.com",
    "600555666",
];

/// Builds the template workbook and returns its bytes.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Estudiantes")?;
    for (col, (label, _)) in HEADER_DICTIONARY.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *label, &bold)?;
    }
    for (col, value) in EXAMPLE_ROW.iter().enumerate() {
        sheet.write(1, col as u16, *value)?;
    }

    let instructions = workbook.add_worksheet();
    instructions.set_name("Instrucciones")?;
    for (col, label) in ["Campo", "Descripción", "Obligatorio", "Formato / Opciones"]
        .iter()
        .enumerate()
    {
        instructions.write_with_format(0, col as u16, *label, &bold)?;
    }
    for (row, (field, description, required, format)) in FIELD_GUIDE.iter().enumerate() {
        let row = (row + 1) as u32;
        instructions.write(row, 0, *field)?;
        instructions.write(row, 1, *description)?;
        instructions.write(row, 2, *required)?;
        instructions.write(row, 3, *format)?;
    }

    workbook.save_to_buffer()
}
