//! Fixed prompt text sent to the model.

/// Instructions framing every conversation.
pub const SYSTEM_PROMPT: &str = "Eres un asistente especializado en analisis y escritura de chistes.

Tu conocimiento se basa en el METODO, un sistema de analisis de humor con estos conceptos:

ESTRUCTURA DE UN CHISTE:
1. PREMISA: Contiene el concepto principal y prepara la informacion
   - Concepto: puede ser simple o compuesto
   - Elemento mecanico: detalle de la realidad que tenemos asumido

2. RUPTURA: Donde se altera la realidad usando una tecnica
   - Tecnicas: personificacion, exageracion, inversion, literalizacion, etc.
   - Transforma el elemento mecanico en algo absurdo

3. REMATE: Como se representa la realidad absurda
   - Estructuras: \"es como...\", \"esto es peor que...\", directo, etc.

FORMAS DE DISECCIONAR UN CONCEPTO:
- Lo que tienen en comun (ej: casa+arbol -> madera)
- Por tipos/diferenciacion (ej: camara -> seguridad -> esta en el techo)
- [Otras que se vayan descubriendo]

TU ROL:
- Ayudar a ESCRIBIR chistes, no escribirlos por el usuario
- Sugerir formas de desarrollar conceptos
- Proponer realidades absurdas a partir de elementos mecanicos
- Buscar ejemplos en la biblioteca de chistes analizados
- Sugerir tecnicas de ruptura aplicables

IMPORTANTE:
- Eres una herramienta de apoyo al proceso creativo
- No escribes chistes completos, sugieres direcciones
- Te basas en la biblioteca de chistes analizados cuando sea relevante
";

/// Prefix of the second system message carrying library context.
pub const LIBRARY_CONTEXT_PREFIX: &str = "CONTEXTO DE LA BIBLIOTECA:\n\n";

/// Header of a non-empty library context.
pub const LIBRARY_HEADER: &str = "BIBLIOTECA DE CHISTES ANALIZADOS:\n\n";

/// Library context when no entry qualifies.
pub const EMPTY_LIBRARY: &str = "La biblioteca de chistes analizados esta vacia.";

/// Title keywords (matched against the uppercased title) that make an
/// entry part of the library context.
pub const LIBRARY_KEYWORDS: [&str; 3] = ["EJEMPLO", "CATALOGO", "PRINCIPIO"];

pub fn develop(concepto: &str) -> String {
    format!(
        "Tengo el concepto: \"{concepto}\"

Ayudame a desarrollarlo:
1. Que tipo de concepto es (simple/compuesto)?
2. Como podria diseccionarlo para encontrar el elemento mecanico?
3. Que detalles de la realidad tiene asumidos?
4. Que tecnicas de ruptura podrian funcionar?

Dame sugerencias concretas, no escribas el chiste por mi."
    )
}

pub fn absurd_realities(elemento_mecanico: &str) -> String {
    format!(
        "Tengo este elemento mecanico (detalle de la realidad): \"{elemento_mecanico}\"

Proponme realidades absurdas que podrian surgir de alterar este elemento.
Dame varias opciones usando diferentes tecnicas de ruptura.

Solo dame las ideas/direcciones, no chistes completos."
    )
}

pub fn analyze(concepto: &str) -> String {
    format!(
        "Analiza el concepto: \"{concepto}\"

1. Tipos: tiene diferentes tipos/variantes?
2. Contexto: donde aparece normalmente?
3. Caracteristicas: que lo define?
4. Asociaciones: con que otros conceptos se relaciona?
5. Elementos mecanicos potenciales: que detalles de la realidad tiene?

Basate en ejemplos de la biblioteca si hay alguno similar."
    )
}

/// Example-search request: technique wins over concept; with neither,
/// ask for a summary of the library.
pub fn find_examples(tecnica: Option<&str>, concepto: Option<&str>) -> String {
    let tecnica = tecnica.filter(|t| !t.is_empty());
    let concepto = concepto.filter(|c| !c.is_empty());
    match (tecnica, concepto) {
        (Some(tecnica), _) => format!(
            "Busca en la biblioteca ejemplos de chistes que usen la tecnica: {tecnica}"
        ),
        (None, Some(concepto)) => format!(
            "Busca en la biblioteca ejemplos de chistes con conceptos similares a: {concepto}"
        ),
        (None, None) => "Dame un resumen de los ejemplos disponibles en la biblioteca".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technique_takes_precedence() {
        assert_eq!(
            find_examples(Some("inversion"), Some("gato")),
            "Busca en la biblioteca ejemplos de chistes que usen la tecnica: inversion"
        );
    }

    #[test]
    fn concept_then_summary() {
        assert_eq!(
            find_examples(None, Some("gato")),
            "Busca en la biblioteca ejemplos de chistes con conceptos similares a: gato"
        );
        assert_eq!(
            find_examples(None, None),
            "Dame un resumen de los ejemplos disponibles en la biblioteca"
        );
        assert_eq!(
            find_examples(Some(""), None),
            "Dame un resumen de los ejemplos disponibles en la biblioteca"
        );
    }

    #[test]
    fn templates_quote_their_argument() {
        assert!(develop("gato").starts_with("Tengo el concepto: \"gato\"\n\nAyudame"));
        assert!(absurd_realities("los gatos caen de pie").contains("\"los gatos caen de pie\""));
        assert!(analyze("camara").ends_with("si hay alguno similar."));
    }

    #[test]
    fn system_prompt_shape() {
        assert!(SYSTEM_PROMPT.starts_with("Eres un asistente especializado"));
        assert!(SYSTEM_PROMPT.ends_with("cuando sea relevante\n"));
    }
}
