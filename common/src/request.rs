//! 投稿リクエストの組み立てとレスポンス解釈
//!
//! マルチパートの中身をHTTPライブラリに依存しない形（`FormField`の列）で作り、
//! CLI（reqwest）とWeb（FormData）がそれぞれ自分の転送形式に写す。

use crate::elements::to_json_array;
use crate::error::{Error, Result};
use crate::form::{DatabaseFilter, JobSubmission, SubmitEndpoint};
use serde_json::Value;

/// マルチパートの値
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// パターンファイル本体
    PatternFile,
    /// `JobSubmission::structure_files` の添字
    StructureFile(usize),
}

/// マルチパートの1フィールド
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FieldValue::Text(value.into()),
        }
    }

    fn file(name: &'static str, value: FieldValue) -> Self {
        Self { name, value }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl JobSubmission {
    /// 送信するマルチパートのフィールド列（送信順）
    ///
    /// MP専用の2項目はデータベースがMPのときだけ含める。
    pub fn multipart_fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::file("pattern_file", FieldValue::PatternFile)];

        let required = FormField::text("required_elements", to_json_array(&self.required_elements));
        let exclude = FormField::text("exclude_elements", to_json_array(&self.exclude_elements));

        match self.endpoint {
            SubmitEndpoint::V2 => {
                fields.push(FormField::text("user", self.user.clone()));
                fields.push(FormField::text("chemical_system", self.chemical_system.clone()));
                fields.push(required);
                fields.push(exclude);
                fields.push(FormField::text("wavelength", self.wavelength.clone()));
                fields.push(FormField::text("instrument_profile", self.instrument_profile.clone()));
                fields.push(FormField::text("database", self.database.database().as_str()));
                fields.extend(self.mp_fields());
                fields.push(FormField::text("max_phases", self.max_phases.to_string()));
            }
            SubmitEndpoint::Legacy => {
                fields.push(required);
                fields.push(exclude);
                fields.push(FormField::text("database", self.database.database().as_str()));
                fields.push(FormField::text("user", self.user.clone()));
                fields.push(FormField::text("wavelength", self.wavelength.clone()));
                fields.push(FormField::text("instrument_profile", self.instrument_profile.clone()));
                fields.push(FormField::text("max_phases", self.max_phases.to_string()));
                fields.extend(self.mp_fields());
            }
        }

        let structure_field = self.endpoint.structure_field();
        fields.extend(
            (0..self.structure_files.len())
                .map(|i| FormField::file(structure_field, FieldValue::StructureFile(i))),
        );

        fields
    }

    fn mp_fields(&self) -> Vec<FormField> {
        match &self.database {
            DatabaseFilter::Mp {
                experimental_only,
                max_e_above_hull,
            } => vec![
                FormField::text("mp_experimental_only", experimental_only.to_string()),
                FormField::text("mp_max_e_above_hull", max_e_above_hull.to_string()),
            ],
            DatabaseFilter::Other(_) => Vec::new(),
        }
    }
}

/// 2xxの投稿レスポンスのボディからジョブIDを返す
///
/// ステータスの判定は各転送層の送信ヘルパーが済ませている前提。
/// IDが無い・JSONでない場合は `Error::MissingIdentifier`。
pub fn submitted_job_id(endpoint: SubmitEndpoint, body: &str) -> Result<String> {
    let payload: Value = serde_json::from_str(body).map_err(|_| Error::MissingIdentifier)?;
    job_id_from_payload(endpoint, &payload).ok_or(Error::MissingIdentifier)
}

/// 成功レスポンスからジョブIDを取り出す（旧エンドポイントは数値IDもあり得る）
pub fn job_id_from_payload(endpoint: SubmitEndpoint, payload: &Value) -> Option<String> {
    match payload.get(endpoint.id_field()) {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
