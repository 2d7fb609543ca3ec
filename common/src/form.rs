//! 投稿フォームのモデルとバリデーション
//!
//! フォームの入力値（文字列のまま）を `SubmissionForm` で保持し、
//! `validate` で検証済みの `JobSubmission` に変換する。
//! クライアント側の範囲チェックはUX用のガードであり、最終判断はバックエンドが行う。

use crate::elements::split_elements;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// 受け付けるパターンファイルの拡張子
pub const PATTERN_EXTENSIONS: &[&str] = &["xy", "xrdml", "raw", "xye", "txt", "dat"];

/// 追加構造ファイルの拡張子
pub const STRUCTURE_EXTENSION: &str = "cif";

/// 波長の選択肢（数値[Å]の直接入力も可）
pub const WAVELENGTH_OPTIONS: &[&str] = &["Cu", "Co", "Cr", "Fe", "Mo"];

/// 装置プロファイル
pub const INSTRUMENT_PROFILES: &[&str] = &[
    "Aeris-fds-Pixcel1d-Medipix3",
    "synchrotron",
    "LBL-d8-LynxEyeXE",
    "d8-solxe-fds-0600",
    "siemens-d5000-fds1mm",
];

pub const DEFAULT_REQUIRED_ELEMENTS: &str = "Y, Mo, O";
pub const DEFAULT_MAX_PHASES: u32 = 200;
pub const DEFAULT_MAX_E_ABOVE_HULL: f64 = 0.1;

/// 結晶構造データベース
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Database {
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "ICSD")]
    Icsd,
    #[serde(rename = "MP")]
    Mp,
    /// データベースを使わず追加CIFのみで探索
    #[serde(rename = "NONE")]
    CustomOnly,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Cod => "COD",
            Database::Icsd => "ICSD",
            Database::Mp => "MP",
            Database::CustomOnly => "NONE",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COD" => Ok(Database::Cod),
            "ICSD" => Ok(Database::Icsd),
            "MP" => Ok(Database::Mp),
            "NONE" => Ok(Database::CustomOnly),
            _ => Err(format!("Unknown database: {}. Use COD, ICSD, MP, or NONE", s)),
        }
    }
}

/// 投稿先エンドポイントの世代
///
/// V2 が正。Legacy は旧フォームとの互換のために残している。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmitEndpoint {
    #[default]
    V2,
    Legacy,
}

impl SubmitEndpoint {
    /// APIベースからの相対パス
    pub fn path(&self) -> &'static str {
        match self {
            SubmitEndpoint::V2 => "/jobs",
            SubmitEndpoint::Legacy => "/search",
        }
    }

    /// 成功レスポンスでジョブIDを持つフィールド
    pub fn id_field(&self) -> &'static str {
        match self {
            SubmitEndpoint::V2 => "job_id",
            SubmitEndpoint::Legacy => "wf_id",
        }
    }

    /// 追加CIFのマルチパートフィールド名
    pub fn structure_field(&self) -> &'static str {
        match self {
            SubmitEndpoint::V2 => "custom_cifs",
            SubmitEndpoint::Legacy => "additional_phases",
        }
    }

    pub fn max_phases_range(&self) -> RangeInclusive<u32> {
        match self {
            SubmitEndpoint::V2 => 10..=800,
            SubmitEndpoint::Legacy => 10..=5000,
        }
    }

    pub fn hull_range(&self) -> RangeInclusive<f64> {
        match self {
            SubmitEndpoint::V2 => 0.0..=2.0,
            SubmitEndpoint::Legacy => 0.0..=1.0,
        }
    }

    /// 画面に出すデータベースの選択肢
    pub fn databases(&self) -> &'static [Database] {
        match self {
            SubmitEndpoint::V2 => &[Database::Icsd, Database::Cod, Database::Mp],
            SubmitEndpoint::Legacy => &[Database::Cod, Database::Icsd, Database::Mp, Database::CustomOnly],
        }
    }

    pub fn requires_chemical_system(&self) -> bool {
        matches!(self, SubmitEndpoint::V2)
    }
}

/// 選択されたファイルのメタ情報（中身は各プラットフォーム側で保持）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// 小文字化した拡張子
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    pub fn is_pattern_file(&self) -> bool {
        self.extension()
            .map(|ext| PATTERN_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    pub fn is_structure_file(&self) -> bool {
        self.extension().as_deref() == Some(STRUCTURE_EXTENSION)
    }
}

/// MP専用フィルタ（入力値のまま）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpFilters {
    pub experimental_only: bool,
    pub max_e_above_hull: String,
}

impl Default for MpFilters {
    fn default() -> Self {
        Self {
            experimental_only: false,
            max_e_above_hull: DEFAULT_MAX_E_ABOVE_HULL.to_string(),
        }
    }
}

/// データベース選択
///
/// MPのときだけ追加フィルタを持つ。表示の出し分けはこの判別子で行う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatabaseSelection {
    Mp(MpFilters),
    /// MP以外（`Database::Mp` は入らない）
    Other(Database),
}

impl DatabaseSelection {
    pub fn database(&self) -> Database {
        match self {
            DatabaseSelection::Mp(_) => Database::Mp,
            DatabaseSelection::Other(db) => *db,
        }
    }

    pub fn mp_filters(&self) -> Option<&MpFilters> {
        match self {
            DatabaseSelection::Mp(filters) => Some(filters),
            DatabaseSelection::Other(_) => None,
        }
    }

    pub fn mp_filters_mut(&mut self) -> Option<&mut MpFilters> {
        match self {
            DatabaseSelection::Mp(filters) => Some(filters),
            DatabaseSelection::Other(_) => None,
        }
    }
}

/// フォームの項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    User,
    PatternFile,
    ChemicalSystem,
    RequiredElements,
    Wavelength,
    InstrumentProfile,
    Database,
    MaxPhases,
    MpMaxEAboveHull,
    StructureFiles,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::User => "Your name",
            Field::PatternFile => "Pattern file",
            Field::ChemicalSystem => "Chemical system",
            Field::RequiredElements => "Required elements",
            Field::Wavelength => "Wavelength",
            Field::InstrumentProfile => "Instrument profile",
            Field::Database => "Database",
            Field::MaxPhases => "Max phases",
            Field::MpMaxEAboveHull => "MP E-above-hull (eV)",
            Field::StructureFiles => "Custom CIFs",
        }
    }
}

/// 項目ごとのエラーメッセージ（項目順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    errors: Vec<(Field, String)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
            self.errors.sort_by_key(|(f, _)| *f);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.label(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// 検証済みのデータベース指定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatabaseFilter {
    Mp {
        experimental_only: bool,
        max_e_above_hull: f64,
    },
    Other(Database),
}

impl DatabaseFilter {
    pub fn database(&self) -> Database {
        match self {
            DatabaseFilter::Mp { .. } => Database::Mp,
            DatabaseFilter::Other(db) => *db,
        }
    }
}

/// 検証済みの投稿内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub endpoint: SubmitEndpoint,
    pub user: String,
    pub pattern_file: FileRef,
    pub chemical_system: String,
    pub required_elements: Vec<String>,
    pub exclude_elements: Vec<String>,
    pub wavelength: String,
    pub instrument_profile: String,
    pub database: DatabaseFilter,
    pub max_phases: u32,
    pub structure_files: Vec<FileRef>,
}

/// 投稿フォームの入力値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub user: String,
    pub pattern_file: Option<FileRef>,
    pub chemical_system: String,
    pub required_elements: String,
    pub exclude_elements: String,
    pub wavelength: String,
    pub instrument_profile: String,
    pub database: DatabaseSelection,
    pub max_phases: String,
    pub structure_files: Vec<FileRef>,
    /// MP以外に切り替えた時点のMPフィルタ（戻したときに復元する）
    #[serde(default)]
    pub stashed_mp: MpFilters,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            user: String::new(),
            pattern_file: None,
            chemical_system: String::new(),
            required_elements: DEFAULT_REQUIRED_ELEMENTS.to_string(),
            exclude_elements: String::new(),
            wavelength: WAVELENGTH_OPTIONS[0].to_string(),
            instrument_profile: INSTRUMENT_PROFILES[0].to_string(),
            database: DatabaseSelection::Other(Database::Icsd),
            max_phases: DEFAULT_MAX_PHASES.to_string(),
            structure_files: Vec::new(),
            stashed_mp: MpFilters::default(),
        }
    }
}

impl SubmissionForm {
    /// データベースを切り替える
    pub fn select_database(&mut self, database: Database) {
        if database == self.database.database() {
            return;
        }
        let next = match database {
            Database::Mp => DatabaseSelection::Mp(self.stashed_mp.clone()),
            other => DatabaseSelection::Other(other),
        };
        if let DatabaseSelection::Mp(filters) = std::mem::replace(&mut self.database, next) {
            self.stashed_mp = filters;
        }
    }

    /// MPフィルタ欄を表示するか
    pub fn shows_mp_filters(&self) -> bool {
        matches!(self.database, DatabaseSelection::Mp(_))
    }

    /// 入力値を検証して投稿内容を作る
    ///
    /// 1項目でもエラーがあれば `FieldErrors` を返し、リクエストは作られない。
    pub fn validate(&self, endpoint: SubmitEndpoint) -> Result<JobSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let user = self.user.trim();
        if user.is_empty() {
            errors.push(Field::User, "Please enter your name or initials");
        }

        match &self.pattern_file {
            None => errors.push(Field::PatternFile, "Pattern file is required"),
            Some(file) if file.size == 0 => errors.push(Field::PatternFile, "Pattern file is required"),
            Some(file) if !file.is_pattern_file() => errors.push(
                Field::PatternFile,
                format!("Unsupported pattern file. Use one of: {}", accepted_pattern_list()),
            ),
            Some(_) => {}
        }

        let chemical_system = self.chemical_system.trim();
        if endpoint.requires_chemical_system() && chemical_system.is_empty() {
            errors.push(Field::ChemicalSystem, "Chemical system is required");
        }

        let required_elements = split_elements(&self.required_elements);
        if required_elements.is_empty() {
            errors.push(Field::RequiredElements, "Please enter element symbols");
        }
        let exclude_elements = split_elements(&self.exclude_elements);

        let wavelength = self.wavelength.trim();
        if wavelength.is_empty() {
            errors.push(Field::Wavelength, "Wavelength is required");
        }
        let instrument_profile = self.instrument_profile.trim();
        if instrument_profile.is_empty() {
            errors.push(Field::InstrumentProfile, "Instrument profile is required");
        }

        let max_phases = match parse_max_phases(&self.max_phases, endpoint.max_phases_range()) {
            Ok(value) => value,
            Err(message) => {
                errors.push(Field::MaxPhases, message);
                0
            }
        };

        let database = match &self.database {
            DatabaseSelection::Mp(filters) => {
                match parse_hull(&filters.max_e_above_hull, endpoint.hull_range()) {
                    Ok(max_e_above_hull) => DatabaseFilter::Mp {
                        experimental_only: filters.experimental_only,
                        max_e_above_hull,
                    },
                    Err(message) => {
                        errors.push(Field::MpMaxEAboveHull, message);
                        DatabaseFilter::Mp {
                            experimental_only: filters.experimental_only,
                            max_e_above_hull: DEFAULT_MAX_E_ABOVE_HULL,
                        }
                    }
                }
            }
            DatabaseSelection::Other(db) => DatabaseFilter::Other(*db),
        };
        if !endpoint.databases().contains(&database.database()) {
            errors.push(
                Field::Database,
                format!("{} is not available on this endpoint", database.database()),
            );
        }

        if let Some(bad) = self.structure_files.iter().find(|f| !f.is_structure_file()) {
            errors.push(
                Field::StructureFiles,
                format!("{} is not a .{} file", bad.name, STRUCTURE_EXTENSION),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // エラーが無ければ pattern_file は必ず Some
        let pattern_file = match &self.pattern_file {
            Some(file) => file.clone(),
            None => return Err(errors),
        };

        Ok(JobSubmission {
            endpoint,
            user: user.to_string(),
            pattern_file,
            chemical_system: chemical_system.to_string(),
            required_elements,
            exclude_elements,
            wavelength: wavelength.to_string(),
            instrument_profile: instrument_profile.to_string(),
            database,
            max_phases,
            structure_files: self.structure_files.clone(),
        })
    }
}

fn accepted_pattern_list() -> String {
    PATTERN_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_max_phases(value: &str, range: RangeInclusive<u32>) -> Result<u32, String> {
    let parsed: u32 = value
        .trim()
        .parse()
        .map_err(|_| "Provide a numeric count".to_string())?;
    if parsed < *range.start() {
        return Err(format!("At least {} phases", range.start()));
    }
    if parsed > *range.end() {
        return Err(format!("Keep at or below {} phases", range.end()));
    }
    Ok(parsed)
}

fn parse_hull(value: &str, range: RangeInclusive<f64>) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| "Provide a numeric hull value".to_string())?;
    if !parsed.is_finite() {
        return Err("Provide a numeric hull value".to_string());
    }
    if parsed < *range.start() {
        return Err(format!("Must be ≥ {}", range.start()));
    }
    if parsed > *range.end() {
        return Err(format!("Must be ≤ {}", range.end()));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_only_database_is_legacy_only() {
        let mut form = filled_form();
        form.select_database(Database::CustomOnly);

        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert_eq!(errors.get(Field::Database), Some("NONE is not available on this endpoint"));
        assert!(form.validate(SubmitEndpoint::Legacy).is_ok());
    }

    fn filled_form() -> SubmissionForm {
        SubmissionForm {
            user: "kf".to_string(),
            pattern_file: Some(FileRef::new("YMoO_scan.xy", 2048)),
            chemical_system: "Y-Mo-O".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_v2_form() {
        let submission = filled_form().validate(SubmitEndpoint::V2).expect("検証失敗");
        assert_eq!(submission.required_elements, vec!["Y", "Mo", "O"]);
        assert!(submission.exclude_elements.is_empty());
        assert_eq!(submission.max_phases, 200);
        assert_eq!(submission.database, DatabaseFilter::Other(Database::Icsd));
    }

    #[test]
    fn test_empty_required_elements_rejected() {
        let form = SubmissionForm {
            required_elements: " , ".to_string(),
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert_eq!(errors.get(Field::RequiredElements), Some("Please enter element symbols"));
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let form = SubmissionForm::default();
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert!(errors.get(Field::User).is_some());
        assert!(errors.get(Field::PatternFile).is_some());
        assert!(errors.get(Field::ChemicalSystem).is_some());
        // 項目順に並ぶ
        let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![Field::User, Field::PatternFile, Field::ChemicalSystem]);
    }

    #[test]
    fn test_legacy_does_not_need_chemical_system() {
        let form = SubmissionForm {
            chemical_system: String::new(),
            ..filled_form()
        };
        assert!(form.validate(SubmitEndpoint::Legacy).is_ok());
    }

    #[test]
    fn test_pattern_extension_checked() {
        let form = SubmissionForm {
            pattern_file: Some(FileRef::new("scan.png", 10)),
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert!(errors.get(Field::PatternFile).unwrap().contains(".xrdml"));

        let form = SubmissionForm {
            pattern_file: Some(FileRef::new("SCAN.XRDML", 10)),
            ..filled_form()
        };
        assert!(form.validate(SubmitEndpoint::V2).is_ok());
    }

    #[test]
    fn test_empty_pattern_file_rejected() {
        let form = SubmissionForm {
            pattern_file: Some(FileRef::new("scan.xy", 0)),
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert_eq!(errors.get(Field::PatternFile), Some("Pattern file is required"));
    }

    #[test]
    fn test_max_phases_bounds_per_endpoint() {
        let form = SubmissionForm {
            max_phases: "1500".to_string(),
            ..filled_form()
        };
        assert!(form.validate(SubmitEndpoint::V2).is_err());
        assert_eq!(form.validate(SubmitEndpoint::Legacy).unwrap().max_phases, 1500);

        let form = SubmissionForm {
            max_phases: "5".to_string(),
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::Legacy).unwrap_err();
        assert_eq!(errors.get(Field::MaxPhases), Some("At least 10 phases"));

        let form = SubmissionForm {
            max_phases: "many".to_string(),
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert_eq!(errors.get(Field::MaxPhases), Some("Provide a numeric count"));
    }

    #[test]
    fn test_hull_only_checked_for_mp() {
        let mut form = filled_form();
        form.select_database(Database::Mp);
        form.database.mp_filters_mut().unwrap().max_e_above_hull = "1.5".to_string();

        assert!(form.validate(SubmitEndpoint::V2).is_ok());
        let errors = form.validate(SubmitEndpoint::Legacy).unwrap_err();
        assert_eq!(errors.get(Field::MpMaxEAboveHull), Some("Must be ≤ 1"));

        form.select_database(Database::Cod);
        assert!(form.validate(SubmitEndpoint::Legacy).is_ok());
    }

    #[test]
    fn test_mp_filters_restored_after_switching_back() {
        let mut form = filled_form();
        assert!(!form.shows_mp_filters());

        form.select_database(Database::Mp);
        assert!(form.shows_mp_filters());
        {
            let filters = form.database.mp_filters_mut().unwrap();
            filters.experimental_only = true;
            filters.max_e_above_hull = "0.05".to_string();
        }

        form.select_database(Database::Icsd);
        assert!(form.database.mp_filters().is_none());

        form.select_database(Database::Mp);
        let filters = form.database.mp_filters().unwrap();
        assert!(filters.experimental_only);
        assert_eq!(filters.max_e_above_hull, "0.05");
    }

    #[test]
    fn test_structure_files_must_be_cif() {
        let form = SubmissionForm {
            structure_files: vec![FileRef::new("extra.cif", 5), FileRef::new("notes.txt", 5)],
            ..filled_form()
        };
        let errors = form.validate(SubmitEndpoint::V2).unwrap_err();
        assert!(errors.get(Field::StructureFiles).unwrap().contains("notes.txt"));
    }

    #[test]
    fn test_database_from_str() {
        assert_eq!("mp".parse::<Database>().unwrap(), Database::Mp);
        assert_eq!("NONE".parse::<Database>().unwrap(), Database::CustomOnly);
        assert!("OQMD".parse::<Database>().is_err());
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.push(Field::MaxPhases, "At least 10 phases");
        errors.push(Field::User, "Please enter your name or initials");
        assert_eq!(
            errors.to_string(),
            "Your name: Please enter your name or initials; Max phases: At least 10 phases"
        );
    }
}
