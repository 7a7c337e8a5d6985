use super::*;

#[derive(Debug, Parser)]
pub struct Block {
    #[arg(help = "Read getblocktemplate JSON from <TEMPLATE>, or `-` for stdin.")]
    template: PathBuf,
    #[arg(long, help = "Use header time <NTIME>, 4 bytes of hex in header order.")]
    ntime: Ntime,
    #[arg(long, help = "Use header nonce <NONCE>, 32 bytes of hex.")]
    nonce: Nonce,
    #[arg(
        long = "solution",
        required = true,
        help = "Submit <SOLUTION>, length-prefixed solution hex. May be repeated."
    )]
    solutions: Vec<Solution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub job_id: JobId,
    pub header: String,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub solution: Solution,
    pub accepted: bool,
    pub block: Option<String>,
    pub size: Option<usize>,
}

impl Block {
    pub(crate) fn run(self, settings: &Settings) -> Result {
        let template = publish_template(settings, &self.template)?;

        let header = template.serialize_header(&self.ntime, &self.nonce);

        let submissions = self
            .solutions
            .into_iter()
            .map(|solution| {
                if template.register_submit(&header, &solution) {
                    let block = template.serialize_block(&header, &solution);
                    Submission {
                        solution,
                        accepted: true,
                        size: Some(block.len()),
                        block: Some(hex::encode(block)),
                    }
                } else {
                    warn!("Rejecting duplicate solution for job {}", template.job_id());
                    Submission {
                        solution,
                        accepted: false,
                        block: None,
                        size: None,
                    }
                }
            })
            .collect();

        print_json(&Output {
            job_id: template.job_id(),
            header: hex::encode(header),
            submissions,
        })
    }
}
