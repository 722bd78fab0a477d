use serde::{Deserialize, Serialize};

/// The body of a successful dictionary API lookup: one entry per
/// homograph the API knows about.
pub type ApiResponse = Vec<WordEntry>;

/// A single word entry returned by the dictionary API.
///
/// Only the fields the output rows need are modelled. Anything else the
/// API sends (`phonetics`, `license`, `sourceUrls`, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    /// IPA transcription, e.g. "/ˈhɛləʊ/".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

/// One part-of-speech grouping within a word entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Vec<DefinitionEntry>,
}

/// A single sense of a meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    pub definition: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"[
          {
            "word": "hello",
            "phonetic": "həˈləʊ",
            "phonetics": [{ "text": "həˈləʊ", "audio": "//ssl.gstatic.com/hello.mp3" }],
            "origin": "early 19th century: variant of earlier hollo.",
            "meanings": [
              {
                "partOfSpeech": "exclamation",
                "definitions": [
                  {
                    "definition": "used as a greeting or to begin a phone conversation.",
                    "example": "hello there, Katie!",
                    "synonyms": [],
                    "antonyms": []
                  }
                ]
              },
              {
                "partOfSpeech": "noun",
                "definitions": [
                  {
                    "definition": "an utterance of ‘hello’; a greeting.",
                    "synonyms": ["greeting"],
                    "antonyms": []
                  }
                ]
              }
            ]
          }
        ]"#;

        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.len(), 1);
        let entry = &response[0];
        assert_eq!(entry.word, "hello");
        assert_eq!(entry.phonetic.as_deref(), Some("həˈləʊ"));
        assert_eq!(entry.meanings.len(), 2);
        assert_eq!(entry.meanings[0].part_of_speech.as_deref(), Some("exclamation"));
        assert_eq!(
            entry.meanings[0].definitions[0].example.as_deref(),
            Some("hello there, Katie!")
        );
        assert_eq!(entry.meanings[1].definitions[0].synonyms, vec!["greeting"]);
        assert!(entry.meanings[1].definitions[0].example.is_none());
    }

    #[test]
    fn test_optional_fields_absent() {
        let json = r#"[{ "word": "keyboard", "meanings": [{ "definitions": [{ "definition": "a panel of keys" }] }] }]"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        let entry = &response[0];
        assert!(entry.phonetic.is_none());
        assert!(entry.origin.is_none());
        assert!(entry.meanings[0].part_of_speech.is_none());
        assert!(entry.meanings[0].definitions[0].synonyms.is_empty());
        assert!(entry.meanings[0].definitions[0].antonyms.is_empty());
    }
}
