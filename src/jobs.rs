use super::*;

/// Live templates by job id.
///
/// Every published template cleans jobs, so at most one template is valid at
/// a time. Older ones stay alive only while sessions still hold an `Arc`.
#[derive(Debug)]
pub struct Jobs {
    latest: Option<Arc<Template>>,
    next_id: JobId,
    valid: HashMap<JobId, Arc<Template>>,
}

impl Default for Jobs {
    fn default() -> Self {
        Self::new()
    }
}

impl Jobs {
    pub fn new() -> Self {
        Self {
            next_id: JobId::new(0),
            valid: HashMap::new(),
            latest: None,
        }
    }

    pub fn next_id(&mut self) -> JobId {
        let id = self.next_id;
        self.next_id = self.next_id.next();
        id
    }

    pub fn get(&self, id: &JobId) -> Option<Arc<Template>> {
        self.valid.get(id).cloned()
    }

    pub fn latest(&self) -> Option<&Arc<Template>> {
        self.latest.as_ref()
    }

    pub fn len(&self) -> usize {
        self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    pub fn publish(&mut self, template: Arc<Template>) {
        for (id, stale) in self.valid.drain() {
            if stale.submissions().is_empty() {
                debug!("Dropping template {id}");
            } else {
                warn!(
                    "Dropping template {id} with {} submissions",
                    stale.submissions().len()
                );
            }
        }

        info!(
            "Publishing template {} at height {}",
            template.job_id(),
            template.height()
        );

        self.latest = Some(template.clone());
        self.valid.insert(template.job_id(), template);
    }
}
