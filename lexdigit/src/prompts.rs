//! Prompt text sent to the model

use crate::law_model::IndexNode;

/// Prompt asking for metadata and the high-level outline
pub fn structure_prompt() -> String {
    r#"
Analiza este documento legal (PDF, Word, etc.) y genera un ÍNDICE ESTRUCTURAL DE ALTO NIVEL.

1. METADATOS:
   - Título Oficial.
   - Fecha Última Reforma (busca "Última Reforma DOF...").
   - Presentación: Texto introductorio completo.

2. ESTRUCTURA (ESQUELETO):
   - Identifica SOLO los TÍTULOS y CAPÍTULOS.
   - NO listes artículos individuales.
   - Rango de páginas estimado para cada sección.

Output JSON Schema:
{
  "lawTitle": string,
  "lastReformDate": string,
  "presentationText": string,
  "structure": [
     {
       "type": "TITULO" | "CAPITULO",
       "id": string,
       "description": string,
       "pageRange": string,
       "children": [ ... ]
     }
  ]
}
"#
    .to_string()
}

/// Prompt asking for the chunks of one outline node
///
/// Without a focus node the whole document is converted.
pub fn conversion_prompt(focus: Option<&IndexNode>) -> String {
    let mut prompt = String::from("\nActúa como digitalizador legal (Akoma Ntoso).\n");

    if let Some(node) = focus {
        prompt.push_str(&format!(
            "\nOBJETIVO: Extraer contenido de la sección: \"{} {}\".\n",
            node.id,
            node.description.as_deref().unwrap_or("")
        ));
        prompt.push_str(&format!(
            "Rango sugerido: Páginas {}.\n",
            node.page_range.as_deref().unwrap_or("Todo el documento")
        ));
        prompt.push_str(
            r#"
INSTRUCCIONES CLAVE:
1. Fragmenta en Artículos individuales (chunks).
2. Si un artículo tiene fracciones romanas largas, divídelo en sub-chunks.
3. Copia textual (Verbatim). Incluye "Reformado DOF...".
4. Si la sección está vacía o no se encuentra, devuelve "chunks": [].
"#,
        );
    }

    prompt.push_str(
        r#"
OUTPUT JSON (chunks array):
{
  "chunks": [
    {
      "id": "Art. X",
      "title": "Titulo opcional",
      "page": 1,
      "content": "Texto completo...",
      "lastModified": "Fecha DOF",
      "officialCitation": "Ley...",
      "paragraphs": [
        { "text": "Párrafo 1...", "reformDate": "DOF..." }
      ]
    }
  ]
}
"#,
    );

    prompt
}

/// Prompt asking for a five-phase digitization roadmap
pub fn roadmap_prompt(context: &str, country: &str) -> String {
    format!(
        "Genera hoja de ruta de política pública (5 fases) para digitalización de leyes en {}. \
         Contexto: {}. Return JSON array of objects with phase, title, description, actionItems.",
        country, context
    )
}
