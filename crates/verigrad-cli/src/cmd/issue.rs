use anyhow::Result;
use verigrad_solana_client::form::{current_year, user_message};
use verigrad_solana_client::{FormController, IssueForm, IssueOutcome, IssuePath, RpcGateway};

use crate::args::FormArgs;
use crate::config::Settings;
use crate::output;

impl FormArgs {
    fn to_form(&self) -> IssueForm {
        IssueForm {
            student_name: self.student_name.clone(),
            student_wallet: self.student_wallet.clone().unwrap_or_default(),
            degree_program: self.degree_program.clone(),
            degree_type: self.degree_type.clone(),
            graduation_year: self.year.unwrap_or_else(current_year),
            institution: self.institution.clone(),
            gpa: self.gpa.clone().unwrap_or_default(),
            honors: self.honors.clone().unwrap_or_default(),
        }
    }
}

pub async fn run(settings: &Settings, form: &FormArgs, path: IssuePath) -> Result<()> {
    let wallet = settings.wallet()?;
    if !wallet.is_connected() {
        tracing::warn!(path = %settings.keypair_path.display(), "no issuer keypair");
    }
    let rpc = RpcGateway::from_config(&settings.client);
    let controller = FormController::with_form(form.to_form(), path);

    let pb = output::spinner();
    let result = controller
        .submit(&rpc, &settings.client, &wallet, |s| {
            pb.set_message(s.message.clone())
        })
        .await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            if let Some(status) = controller.status() {
                output::status(true, &status.message);
            }
            match outcome {
                IssueOutcome::Token(r) => output::print(&r),
                IssueOutcome::Record(r) => output::print(&r),
            }
        }
        Err(err) => {
            let message = controller
                .status()
                .map(|s| s.message)
                .unwrap_or_else(|| user_message(&err));
            Err(super::fail(err, &message))
        }
    }
}
