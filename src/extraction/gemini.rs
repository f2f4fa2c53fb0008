use crate::config::ExtractionConfig;
use crate::domain::{Category, ExtractedData};
use crate::error::{AdminError, Result};
use crate::extraction::ChunkExtractor;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::warn;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*\n(.*?)\n```").unwrap());
static FENCED_ANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\s*\n(.*?)\n```").unwrap());

/// Extraction backed by the Gemini generateContent endpoint
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    pub fn from_env(config: &ExtractionConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
        })
    }

    fn build_prompt(
        chunk: &str,
        municipality_name: &str,
        chunk_index: usize,
        total_chunks: usize,
    ) -> String {
        let category_list = Category::ALL
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "あなたはごみ収集カレンダーとごみ分別情報を抽出するアシスタントです。\n\
             以下の年間カレンダーPDFテキストの一部（{part}/{total}）から情報を抽出し、JSON形式で返してください。\n\
             \n\
             市町村名: {municipality}\n\
             \n\
             PDFテキスト（部分 {part}/{total}）:\n\
             {chunk}\n\
             \n\
             以下のJSON形式で返してください（必ず正しいJSONフォーマットで返してください）：\n\
             {{\n\
               \"areas\": [\n\
                 {{\n\
                   \"name\": \"地域名\",\n\
                   \"schedule\": {{\n\
                     \"1\": {{ \"burnable\": [1月の収集日（1-31）の配列], ... }},\n\
                     ...\n\
                     \"12\": {{ \"burnable\": [12月の収集日の配列], ... }}\n\
                   }}\n\
                 }}\n\
               ],\n\
               \"garbageItems\": [\n\
                 {{ \"name\": \"品目名\", \"category\": \"カテゴリー\", \"description\": \"出し方の説明\", \"examples\": [\"例1\", \"例2\"] }}\n\
               ]\n\
             }}\n\
             \n\
             カテゴリー一覧（categoryはこのいずれかを指定してください）：\n\
             {categories}\n\
             \n\
             注意事項：\n\
             - このテキスト部分から抽出できる情報のみを返してください\n\
             - 情報がない場合は空の配列を返してください\n\
             - 収集日は月内の日付（1-31）の数値配列で返してください\n\
             - 月は文字列のキー（\"1\", \"2\", ... \"12\"）で指定してください\n\
             - JSON形式のみ返し、説明文は含めないでください\n",
            part = chunk_index + 1,
            total = total_chunks,
            municipality = municipality_name,
            chunk = chunk,
            categories = category_list,
        )
    }

    /// Pulls the fenced JSON block out of the model response and parses it.
    /// Unparseable output yields an empty result rather than an error so one
    /// bad chunk cannot discard the rest of the run.
    fn parse_response_text(text: &str) -> ExtractedData {
        let json_text = FENCED_JSON
            .captures(text)
            .or_else(|| FENCED_ANY.captures(text))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .unwrap_or(text);

        match serde_json::from_str(json_text) {
            Ok(data) => data,
            Err(e) => {
                warn!("Model output did not parse as extraction JSON: {}", e);
                ExtractedData::default()
            }
        }
    }
}

#[async_trait]
impl ChunkExtractor for GeminiExtractor {
    async fn extract_chunk(
        &self,
        chunk: &str,
        municipality_name: &str,
        chunk_index: usize,
        total_chunks: usize,
    ) -> Result<ExtractedData> {
        let prompt = Self::build_prompt(chunk, municipality_name, chunk_index, total_chunks);
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let value: serde_json::Value = response.json().await?;
        let text = value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AdminError::MissingField("candidates[0].content.parts[0].text not found".into())
            })?;

        Ok(Self::parse_response_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_block() {
        let text = "前置き\n```json\n{\"areas\":[{\"name\":\"中央区\"}],\"garbageItems\":[]}\n```\n後書き";
        let data = GeminiExtractor::parse_response_text(text);
        assert_eq!(data.areas.len(), 1);
        assert_eq!(data.areas[0].name, "中央区");
    }

    #[test]
    fn parses_plain_fence_and_bare_json() {
        let fenced = "```\n{\"areas\":[],\"garbageItems\":[]}\n```";
        assert_eq!(GeminiExtractor::parse_response_text(fenced), ExtractedData::default());

        let bare = r#"{"areas":[],"garbageItems":[]}"#;
        assert_eq!(GeminiExtractor::parse_response_text(bare), ExtractedData::default());
    }

    #[test]
    fn unparseable_output_yields_empty_result() {
        let data = GeminiExtractor::parse_response_text("すみません、抽出できませんでした。");
        assert_eq!(data, ExtractedData::default());
    }

    #[test]
    fn prompt_names_the_municipality_and_chunk_position() {
        let prompt = GeminiExtractor::build_prompt("テキスト", "横浜市", 2, 5);
        assert!(prompt.contains("横浜市"));
        assert!(prompt.contains("3/5"));
        assert!(prompt.contains("cooking_oil"));
    }
}
