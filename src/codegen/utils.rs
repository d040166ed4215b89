//! Naming helpers shared by every emitter.
//!
//! Diagram names are user-typed ("nombre completo", "OrderItem",
//! "categoría"), so every identifier goes through the three forms below.
//! Type names split on separators only and keep the casing inside each word;
//! file names additionally split on lower-to-upper transitions.

use convert_case::{Boundary, Case, Casing};

const FILE_BOUNDARIES: &[Boundary] = &[
    Boundary::Space,
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::LowerUpper,
    Boundary::Acronym,
];

/// Replace anything that cannot appear in an identifier with a space.
/// Common accented Latin letters are folded to ASCII.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ç' => 'c',
            'Ç' => 'C',
            c if c.is_ascii_alphanumeric() => c,
            _ => ' ',
        })
        .collect()
}

/// Type-name form: `"nombre completo"` -> `"NombreCompleto"`
pub fn to_type_name(s: &str) -> String {
    let joined: String = sanitize(s)
        .split_whitespace()
        .map(upper_first)
        .collect();

    match joined.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("T{}", joined),
        _ => joined,
    }
}

/// Member-name form: `"nombre completo"` -> `"nombreCompleto"`.
///
/// A leading acronym is lowercased as a whole (`"HTTPServer"` ->
/// `"httpServer"`, `"ID"` -> `"id"`).
pub fn to_member_name(s: &str) -> String {
    let type_name = to_type_name(s);
    if !type_name.chars().any(|c| c.is_ascii_lowercase()) {
        return type_name.to_lowercase();
    }

    let leading_upper = type_name.chars().take_while(|c| c.is_ascii_uppercase()).count();
    if leading_upper <= 1 {
        return lower_first(&type_name);
    }

    let split = leading_upper - 1;
    format!("{}{}", type_name[..split].to_lowercase(), &type_name[split..])
}

/// File/module-name form: `"OrderItem"` -> `"order_item"`
pub fn to_file_name(s: &str) -> String {
    let type_name = to_type_name(s);
    if type_name.is_empty() {
        return type_name;
    }
    type_name.with_boundaries(FILE_BOUNDARIES).to_case(Case::Snake)
}

/// Uppercase the first character, leaving the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Project names lose their whitespace and any path-hostile characters
pub fn sanitize_project_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Java package segment for a project: lowercase alphanumerics only
pub fn package_segment(project_name: &str) -> String {
    let segment: String = project_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match segment.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("p{}", segment),
        Some(_) => segment,
        None => "app".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_type_name("hello_world"), "HelloWorld");
        assert_eq!(to_type_name("nombre completo"), "NombreCompleto");
        assert_eq!(to_member_name("Usuario"), "usuario");
        assert_eq!(to_member_name("fecha-nacimiento"), "fechaNacimiento");
        assert_eq!(to_file_name("OrderItem"), "order_item");
        assert_eq!(to_file_name("Usuario"), "usuario");
    }

    #[test]
    fn test_acronyms_and_digits() {
        assert_eq!(to_type_name("HTTPServer"), "HTTPServer");
        assert_eq!(to_member_name("HTTPServer"), "httpServer");
        assert_eq!(to_file_name("HTTPServer"), "http_server");
        assert_eq!(to_member_name("ID"), "id");
        assert_eq!(to_member_name("usuarioID"), "usuarioID");
        assert_eq!(to_file_name("usuarioID"), "usuario_id");
        assert_eq!(to_type_name("address2"), "Address2");
        assert_eq!(to_type_name("2fa"), "T2fa");
        assert_eq!(to_file_name("2fa"), "t2fa");
    }

    #[test]
    fn test_accents_and_symbols() {
        assert_eq!(to_type_name("categoría"), "Categoria");
        assert_eq!(to_member_name("año fiscal"), "anoFiscal");
        assert_eq!(to_type_name("precio ($)"), "Precio");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_type_name(""), "");
        assert_eq!(to_member_name("   "), "");
        assert_eq!(to_file_name("!!"), "");
    }

    #[test]
    fn test_naming_is_idempotent() {
        let samples = [
            "Usuario", "order_item", "OrderItem", "nombre completo", "HTTPServer",
            "usuarioID", "2fa", "x", "categoría", "a-b-c",
        ];
        for s in samples {
            let type_name = to_type_name(s);
            assert_eq!(to_type_name(&type_name), type_name, "type name of {:?}", s);
            assert_eq!(to_member_name(&type_name), to_member_name(s), "member name of {:?}", s);

            let member = to_member_name(s);
            assert_eq!(to_member_name(&member), member, "member name of {:?}", s);

            let file = to_file_name(s);
            assert_eq!(to_file_name(&file), file, "file name of {:?}", s);
            assert_eq!(to_file_name(&type_name), file, "file name of {:?}", s);
        }
    }

    #[test]
    fn test_project_name_sanitizing() {
        assert_eq!(sanitize_project_name("Mi Tienda Online"), "MiTiendaOnline");
        assert_eq!(sanitize_project_name("../etc/passwd"), "etcpasswd");
        assert_eq!(package_segment("MiTienda-2"), "mitienda2");
        assert_eq!(package_segment("2go"), "p2go");
        assert_eq!(package_segment(""), "app");
    }

    #[test]
    fn test_first_letter_helpers() {
        assert_eq!(upper_first("usuarioList"), "UsuarioList");
        assert_eq!(lower_first("Usuario"), "usuario");
        assert_eq!(upper_first(""), "");
    }
}
