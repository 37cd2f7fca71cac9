//! Form controller submissions against the in-memory ledger.

mod common;

use common::{config, wallet, MockLedger};
use verigrad_core::model::IssueMode;
use verigrad_core::FailureKind;
use verigrad_solana_client::form::{PREPARING, SENDING};
use verigrad_solana_client::{
    FormController, IssueForm, IssueOutcome, IssuePath, StatusKind, Wallet,
};

fn filled() -> IssueForm {
    IssueForm {
        student_name: "Jane Smith".into(),
        degree_program: "Computer Science".into(),
        degree_type: "BSc".into(),
        graduation_year: 2024,
        institution: "Tech University".into(),
        ..IssueForm::default()
    }
}

#[tokio::test]
async fn record_path_reports_progress_and_resets_form() {
    let ledger = MockLedger::new();
    let cfg = config();
    let (wallet, _) = wallet();
    let controller = FormController::with_form(filled(), IssuePath::ProgramRecord);
    let mut seen = Vec::new();

    let outcome = controller
        .submit(&ledger, &cfg, &wallet, |s| seen.push(s.clone()))
        .await
        .unwrap();

    let IssueOutcome::Record(receipt) = outcome else {
        panic!("expected a record receipt");
    };
    let messages: Vec<_> = seen.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(messages[..2], [PREPARING, SENDING]);
    let last = seen.last().unwrap();
    assert_eq!(last.kind, StatusKind::Success);
    assert!(last.message.contains(&receipt.signature[..8]));

    assert_eq!(controller.status(), Some(last.clone()));
    assert_eq!(controller.form(), IssueForm::default());
    assert!(!controller.is_in_flight());
}

#[tokio::test]
async fn token_path_relays_builder_progress() {
    let ledger = MockLedger::new();
    let cfg = config();
    let (wallet, _) = wallet();
    let controller = FormController::with_form(filled(), IssuePath::Token(IssueMode::SPLIT));
    let mut seen = Vec::new();

    let outcome = controller
        .submit(&ledger, &cfg, &wallet, |s| seen.push(s.message.clone()))
        .await
        .unwrap();

    let IssueOutcome::Token(result) = outcome else {
        panic!("expected a token result");
    };
    assert_eq!(result.diploma.degree, "BSc in Computer Science");
    assert_eq!(
        seen,
        vec![
            PREPARING.to_string(),
            "Creating mint account...".to_string(),
            "Creating token account and minting diploma...".to_string(),
            "Diploma token created".to_string(),
            format!("Diploma token issued! Mint: {}", result.mint),
        ]
    );
}

#[tokio::test]
async fn local_checks_surface_as_error_status() {
    let ledger = MockLedger::new();
    let cfg = config();
    let controller = FormController::with_form(filled(), IssuePath::ProgramRecord);

    let err = controller
        .submit(&ledger, &cfg, &Wallet::disconnected(), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::SignerMissing);
    let status = controller.status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, "Please connect your wallet first.");

    let (wallet, _) = wallet();
    controller.edit(|f| f.degree_type.clear());
    let err = controller.submit(&ledger, &cfg, &wallet, |_| {}).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MissingFields);
    assert_eq!(
        controller.status().unwrap().message,
        "Please fill in all required fields."
    );
    assert!(ledger.calls().is_empty());
    // the form is kept on failure
    assert_eq!(controller.form().student_name, "Jane Smith");
}

#[tokio::test]
async fn rejected_signature_keeps_form_and_explains() {
    let ledger = MockLedger::failing_send(0, FailureKind::UserRejected);
    let cfg = config();
    let (wallet, _) = wallet();
    let controller = FormController::with_form(filled(), IssuePath::ProgramRecord);

    controller.submit(&ledger, &cfg, &wallet, |_| {}).await.unwrap_err();
    assert_eq!(
        controller.status().unwrap().message,
        "Failed to issue diploma. Transaction was rejected."
    );
    assert_eq!(controller.form(), filled());
}

#[tokio::test]
async fn second_submission_is_refused_while_first_is_in_flight() {
    let ledger = MockLedger::new();
    ledger.yield_on_rent.set(true);
    let cfg = config();
    let (wallet, _) = wallet();
    let controller = FormController::with_form(filled(), IssuePath::Token(IssueMode::SINGLE));

    let (first, second) = tokio::join!(
        controller.submit(&ledger, &cfg, &wallet, |_| {}),
        controller.submit(&ledger, &cfg, &wallet, |_| {}),
    );

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(err.to_string().contains("already in progress"));
    assert_eq!(ledger.sent.borrow().len(), 1);
    assert!(!controller.is_in_flight());
}
