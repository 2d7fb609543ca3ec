//! 画面状態モデル
//!
//! 一覧・詳細画面の状態をシリアライズ可能な値として持ち、
//! Web側のシグナルやCLIの描画はこれを読むだけにする。

use crate::api::{JobListQuery, StatusFilter};
use crate::display::MISSING_JOB_ID_MESSAGE;
use crate::types::{JobDetail, JobSummary};
use serde::{Deserialize, Serialize};

/// 発行したリクエストの識別子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    seq: u64,
    key: String,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// 古いレスポンスが新しい状態を上書きしないためのガード
///
/// 最後に `begin` したチケットだけが有効。`abandon` で全て無効になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    pub fn begin(&mut self, key: impl Into<String>) -> Ticket {
        self.latest += 1;
        Ticket {
            seq: self.latest,
            key: key.into(),
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.latest
    }

    /// 画面を離れたときなど、発行済みチケットを全て無効にする
    pub fn abandon(&mut self) {
        self.latest += 1;
    }
}

/// 一覧画面の状態
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Loaded(Vec<JobSummary>),
}

/// ジョブ一覧画面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListView {
    pub filter: StatusFilter,
    pub user: Option<String>,
    pub state: ListState,
    guard: RequestGuard,
}

impl JobListView {
    pub fn new(filter: StatusFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn request_query(&self) -> JobListQuery {
        JobListQuery {
            status: self.filter,
            user: self.user.clone(),
            ..Default::default()
        }
    }

    /// 絞り込みを変更する（再取得は呼び出し側）
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// 再取得を開始する。何度呼んでも読み取りだけで副作用は無い
    pub fn begin_refresh(&mut self) -> Ticket {
        self.state = ListState::Loading;
        self.guard.begin(self.filter.as_str())
    }

    /// 取得結果を反映する。古いチケットなら捨てて false
    pub fn finish(&mut self, ticket: &Ticket, result: Result<Vec<JobSummary>, String>) -> bool {
        if !self.guard.is_current(ticket) {
            return false;
        }
        self.state = match result {
            Ok(jobs) => ListState::Loaded(jobs),
            Err(message) => ListState::Failed(message),
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ListState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// 読み込み済みで0件
    pub fn is_empty_state(&self) -> bool {
        matches!(&self.state, ListState::Loaded(jobs) if jobs.is_empty())
    }

    /// 表示する行（絞り込みに合わない行は出さない）
    pub fn visible_rows(&self) -> Vec<&JobSummary> {
        match &self.state {
            ListState::Loaded(jobs) => jobs.iter().filter(|job| self.filter.matches(job.status)).collect(),
            _ => Vec::new(),
        }
    }
}

/// 詳細画面の状態（3状態は排他）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DetailState {
    #[default]
    Loading,
    Failed(String),
    Loaded(Box<JobDetail>),
}

/// ジョブ詳細画面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetailView {
    pub job_id: Option<String>,
    pub state: DetailState,
    guard: RequestGuard,
}

impl JobDetailView {
    /// 表示するジョブIDが変わった
    ///
    /// IDが無ければリクエストせずにエラー状態にする。
    pub fn navigate(&mut self, job_id: Option<&str>) -> Option<Ticket> {
        let job_id = job_id.map(str::trim).filter(|id| !id.is_empty());
        self.job_id = job_id.map(str::to_string);

        match job_id {
            None => {
                self.guard.abandon();
                self.state = DetailState::Failed(MISSING_JOB_ID_MESSAGE.to_string());
                None
            }
            Some(id) => {
                self.state = DetailState::Loading;
                Some(self.guard.begin(id))
            }
        }
    }

    /// 画面を離れた。進行中の取得結果は捨てる
    pub fn leave(&mut self) {
        self.guard.abandon();
    }

    /// 取得結果を反映する。古いチケットなら捨てて false
    pub fn resolve(&mut self, ticket: &Ticket, result: Result<JobDetail, String>) -> bool {
        if !self.guard.is_current(ticket) {
            return false;
        }
        self.state = match result {
            Ok(detail) => DetailState::Loaded(Box::new(detail)),
            Err(message) => DetailState::Failed(message),
        };
        true
    }

    pub fn detail(&self) -> Option<&JobDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(detail.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobStatus;

    fn summary(id: &str, status: JobStatus) -> JobSummary {
        JobSummary {
            job_id: id.to_string(),
            user: "kf".to_string(),
            pattern_filename: "scan.xy".to_string(),
            database: "ICSD".to_string(),
            status,
            num_phases: 0,
            created_at: "2025-03-01T10:00:00".to_string(),
            started_at: None,
            finished_at: None,
            error_message: None,
        }
    }

    fn detail(id: &str) -> JobDetail {
        JobDetail {
            job: summary(id, JobStatus::Completed),
            diagnostics: None,
            solutions: Vec::new(),
        }
    }

    #[test]
    fn test_later_detail_request_wins() {
        let mut view = JobDetailView::default();
        let ticket_a = view.navigate(Some("A")).unwrap();
        let ticket_b = view.navigate(Some("B")).unwrap();

        assert!(view.resolve(&ticket_b, Ok(detail("B"))));
        // Aの応答が後から届いても無視される
        assert!(!view.resolve(&ticket_a, Ok(detail("A"))));

        assert_eq!(view.detail().unwrap().job.job_id, "B");
        assert_eq!(view.job_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_stale_error_ignored() {
        let mut view = JobDetailView::default();
        let ticket_a = view.navigate(Some("A")).unwrap();
        let _ticket_b = view.navigate(Some("B")).unwrap();

        assert!(!view.resolve(&ticket_a, Err("Job not found".to_string())));
        assert_eq!(view.state, DetailState::Loading);
    }

    #[test]
    fn test_missing_job_id() {
        let mut view = JobDetailView::default();
        let ticket = view.navigate(Some("A")).unwrap();
        assert!(view.navigate(Some("  ")).is_none());
        assert_eq!(view.state, DetailState::Failed("Job ID missing from URL.".to_string()));

        // 以前のリクエストも無効
        assert!(!view.resolve(&ticket, Ok(detail("A"))));
    }

    #[test]
    fn test_leave_discards_in_flight() {
        let mut view = JobDetailView::default();
        let ticket = view.navigate(Some("A")).unwrap();
        view.leave();
        assert!(!view.resolve(&ticket, Ok(detail("A"))));
    }

    #[test]
    fn test_list_filter_and_query() {
        let mut view = JobListView::new(StatusFilter::Only(JobStatus::Failed));
        assert_eq!(view.request_query().to_query_string(), "status=FAILED");

        let ticket = view.begin_refresh();
        assert!(view.is_loading());
        assert!(view.finish(
            &ticket,
            Ok(vec![summary("a", JobStatus::Failed), summary("b", JobStatus::Running)])
        ));

        let rows = view.visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_id, "a");
    }

    #[test]
    fn test_list_empty_state() {
        let mut view = JobListView::default();
        assert!(!view.is_empty_state());
        let ticket = view.begin_refresh();
        view.finish(&ticket, Ok(Vec::new()));
        assert!(view.is_empty_state());
    }

    #[test]
    fn test_list_error_and_stale_refresh() {
        let mut view = JobListView::default();
        let first = view.begin_refresh();
        view.set_filter(StatusFilter::Only(JobStatus::Pending));
        let second = view.begin_refresh();

        assert!(!view.finish(&first, Ok(vec![summary("old", JobStatus::Running)])));
        assert!(view.finish(&second, Err("Internal Server Error".to_string())));
        assert_eq!(view.error(), Some("Internal Server Error"));
    }

    #[test]
    fn test_view_state_serializes() {
        let mut view = JobListView::new(StatusFilter::Only(JobStatus::Completed));
        let ticket = view.begin_refresh();
        view.finish(&ticket, Ok(vec![summary("a", JobStatus::Completed)]));

        let json = serde_json::to_string(&view).unwrap();
        let restored: JobListView = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, view);
    }
}
