use crate::board::Board;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::ALL_CATEGORIES;
use crate::error::{BoardError, Result};
use crate::model::{JobPosting, NewJob};
use crate::store::StorageBackend;

use super::helpers::{require_field, view_application};

/// Browse filter over already-loaded jobs. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring of title, description or company.
    pub search: Option<String>,
    /// Exact category; `All Categories` is the same as none.
    pub category: Option<String>,
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
    /// Only the signed-in user's own postings.
    pub mine: bool,
}

impl JobFilter {
    pub fn matches(&self, job: &JobPosting) -> bool {
        let matches_search = match non_empty(&self.search) {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                job.title.to_lowercase().contains(&term)
                    || job.description.to_lowercase().contains(&term)
                    || job.company.to_lowercase().contains(&term)
            }
        };

        let matches_category = match non_empty(&self.category) {
            None => true,
            Some(category) => category == ALL_CATEGORIES || job.category == category,
        };

        let matches_location = match non_empty(&self.location) {
            None => true,
            Some(location) => job
                .location
                .to_lowercase()
                .contains(&location.to_lowercase()),
        };

        matches_search && matches_category && matches_location
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Posts a job as the signed-in user after checking the form fields.
pub fn create<B: StorageBackend>(board: &mut Board<B>, fields: NewJob) -> Result<CmdResult> {
    let user = board.require_user()?;

    let category = require_field("Category", &fields.category)?;
    let category = board
        .config
        .canonical_category(&category)
        .map(str::to_string)
        .ok_or_else(|| {
            BoardError::Validation(format!(
                "Unknown category '{}' (choose one of: {})",
                category,
                board.config.categories.join(", ")
            ))
        })?;

    let requirements: Vec<String> = fields
        .requirements
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    if requirements.is_empty() {
        return Err(BoardError::Validation(
            "Add at least one job requirement".to_string(),
        ));
    }

    let cleaned = NewJob {
        title: require_field("Title", &fields.title)?,
        company: require_field("Company", &fields.company)?,
        location: require_field("Location", &fields.location)?,
        salary: fields.salary.trim().to_string(),
        category,
        description: require_field("Description", &fields.description)?,
        requirements,
    };

    let job = board.registry.create_job(&user.id, cleaned)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Job posted: {} ({})",
            job.title, job.id
        )))
        .with_jobs(vec![job]))
}

pub fn list<B: StorageBackend>(board: &Board<B>, filter: &JobFilter) -> Result<CmdResult> {
    let jobs = if filter.mine {
        let user = board.require_user()?;
        board.registry.list_by_owner(&user.id)
    } else {
        board.registry.list_all()
    };

    let listed: Vec<JobPosting> = jobs.into_iter().filter(|job| filter.matches(job)).collect();
    Ok(CmdResult::default().with_jobs(listed))
}

/// One job, with who posted it. Its owner also gets the applications; an
/// applicant gets a note about their own application.
pub fn show<B: StorageBackend>(board: &Board<B>, job_id: &str) -> Result<CmdResult> {
    let job = board
        .registry
        .get_job(job_id)
        .cloned()
        .ok_or_else(|| BoardError::JobNotFound(job_id.to_string()))?;
    let mut result = CmdResult::default();

    if let Some(poster) = board.identity.find_user(&job.owner_id) {
        result.add_message(CmdMessage::info(format!(
            "Posted by {} <{}>",
            poster.name, poster.email
        )));
    }

    if let Some(user) = board.identity.current_user() {
        let applicants = board.registry.list_applications_for_job(&job.id, &user.id);
        if job.owner_id == user.id {
            result.add_message(CmdMessage::info(format!(
                "{} application(s) received",
                applicants.len()
            )));
            result.applications = applicants
                .into_iter()
                .map(|app| view_application(board, app))
                .collect();
        } else if let Some(mine) = board
            .registry
            .list_applications_by_applicant(&user.id)
            .into_iter()
            .find(|app| app.job_id == job.id)
        {
            result.add_message(CmdMessage::info(format!(
                "You applied on {} (status: {})",
                mine.application_date.format("%Y-%m-%d"),
                mine.status
            )));
        }
    }

    Ok(result.with_jobs(vec![job]))
}

pub fn delete<B: StorageBackend>(board: &mut Board<B>, job_id: &str) -> Result<CmdResult> {
    let user = board.require_user()?;
    if board.registry.get_job(job_id).is_none() {
        return Err(BoardError::JobNotFound(job_id.to_string()));
    }

    let result = match board.registry.delete_job(job_id, &user.id)? {
        Some(removal) => CmdResult::default()
            .with_message(CmdMessage::success(format!(
                "Job deleted: {} ({} application(s) removed)",
                removal.job.title,
                removal.applications.len()
            )))
            .with_jobs(vec![removal.job]),
        None => CmdResult::default().with_message(CmdMessage::warning(
            "You can only delete your own job postings",
        )),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::BoardFixture;
    use crate::model::ApplicationRequest;

    fn job(title: &str, company: &str, location: &str, category: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            ..BoardFixture::sample_job(title)
        }
    }

    #[test]
    fn create_requires_login() {
        let mut fx = BoardFixture::new();
        assert!(matches!(
            create(&mut fx.board, BoardFixture::sample_job("Dev")),
            Err(BoardError::NotAuthenticated)
        ));
    }

    #[test]
    fn create_validates_form_and_cleans_requirements() {
        let mut fx = BoardFixture::new();
        fx.register("Alice");

        let mut missing_title = BoardFixture::sample_job("Dev");
        missing_title.title = "  ".to_string();
        assert!(create(&mut fx.board, missing_title).is_err());

        let mut no_reqs = BoardFixture::sample_job("Dev");
        no_reqs.requirements = vec!["".to_string(), "  ".to_string()];
        assert!(create(&mut fx.board, no_reqs).is_err());

        let mut bad_category = BoardFixture::sample_job("Dev");
        bad_category.category = "Astrology".to_string();
        assert!(create(&mut fx.board, bad_category).is_err());

        let mut ok = BoardFixture::sample_job("Dev");
        ok.category = "technology".to_string();
        ok.requirements = vec![" Rust ".to_string(), "".to_string()];
        let created = create(&mut fx.board, ok).unwrap().jobs.remove(0);
        assert_eq!(created.category, "Technology");
        assert_eq!(created.requirements, vec!["Rust"]);
        assert_eq!(fx.board.registry.list_all().len(), 1);
    }

    #[test]
    fn filter_combines_search_category_and_location() {
        let mut fx = BoardFixture::new();
        fx.register("Alice");
        create(&mut fx.board, job("Rust Engineer", "Ferrous", "Berlin", "Engineering")).unwrap();
        let designer = NewJob {
            description: "Pixel-perfect Figma work".to_string(),
            ..job("Designer", "Pixel", "Remote", "Design")
        };
        create(&mut fx.board, designer).unwrap();
        create(&mut fx.board, job("Accountant", "RUSTY Books", "berlin", "Finance")).unwrap();

        let titles = |filter: JobFilter| -> Vec<String> {
            list(&fx.board, &filter)
                .unwrap()
                .jobs
                .into_iter()
                .map(|j| j.title)
                .collect()
        };

        assert_eq!(titles(JobFilter::default()).len(), 3);
        assert_eq!(
            titles(JobFilter {
                search: Some("rust".into()),
                ..Default::default()
            }),
            vec!["Rust Engineer", "Accountant"]
        );
        // description matches too
        assert_eq!(
            titles(JobFilter {
                search: Some("FIGMA".into()),
                ..Default::default()
            }),
            vec!["Designer"]
        );
        assert_eq!(
            titles(JobFilter {
                search: Some("rust".into()),
                location: Some("BERLIN".into()),
                category: Some("Finance".into()),
                ..Default::default()
            }),
            vec!["Accountant"]
        );
        assert_eq!(
            titles(JobFilter {
                category: Some(ALL_CATEGORIES.into()),
                ..Default::default()
            })
            .len(),
            3
        );
    }

    #[test]
    fn mine_lists_only_own_postings() {
        let mut fx = BoardFixture::new();
        fx.register("Alice");
        create(&mut fx.board, BoardFixture::sample_job("A1")).unwrap();
        fx.register("Bob");
        create(&mut fx.board, BoardFixture::sample_job("B1")).unwrap();

        let filter = JobFilter {
            mine: true,
            ..Default::default()
        };
        let mine = list(&fx.board, &filter).unwrap().jobs;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "B1");
    }

    #[test]
    fn show_gives_owner_the_applications() {
        let mut fx = BoardFixture::new();
        let alice = fx.register("Alice");
        let posted = create(&mut fx.board, BoardFixture::sample_job("Dev"))
            .unwrap()
            .jobs
            .remove(0);
        let bob = fx.register("Bob");
        fx.board
            .registry
            .apply(ApplicationRequest::new(&posted.id, &bob, "cv_gone"))
            .unwrap();

        let as_bob = show(&fx.board, &posted.id).unwrap();
        assert!(as_bob.applications.is_empty());
        assert_eq!(
            as_bob.messages[0].content,
            "Posted by Alice <alice@example.com>"
        );
        assert!(as_bob.messages[1].content.contains("pending"));

        fx.sign_in(&alice);
        let as_alice = show(&fx.board, &posted.id).unwrap();
        assert_eq!(as_alice.applications.len(), 1);
        assert_eq!(as_alice.applications[0].document_label, "CV Document");
    }

    #[test]
    fn delete_by_stranger_warns_and_keeps_job() {
        let mut fx = BoardFixture::new();
        fx.register("Alice");
        let posted = create(&mut fx.board, BoardFixture::sample_job("Dev"))
            .unwrap()
            .jobs
            .remove(0);
        fx.register("Bob");

        let result = delete(&mut fx.board, &posted.id).unwrap();
        assert!(result.jobs.is_empty());
        assert_eq!(fx.board.registry.list_all().len(), 1);
        assert!(matches!(
            delete(&mut fx.board, "job_missing"),
            Err(BoardError::JobNotFound(_))
        ));
    }
}
