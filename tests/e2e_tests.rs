//! End-to-end integration tests
//!
//! These tests drive a complete transfer-and-import run: a temporary
//! directory stands in for the remote store (through `MirrorTransport`),
//! another holds the local staging layout, and rows are booked against a
//! seeded `InMemoryLedger`. Each fixture test:
//! 1. Places tests/fixtures/{name}/input.csv on the remote store with its marker
//! 2. Runs the orchestrator with notifications enabled
//! 3. Compares the file's outcome with expected.txt (`Success` or the
//!    aggregate error text)
//! 4. Checks the side effects that go with that outcome (local cleanup,
//!    uploaded report, notification)
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Each transaction kind on its happy path
//! - Row-level rejections (key, classification, sender, transfer state, ledger validation)
//! - Fail-fast behavior within a file
//! - File-level failures reported as lost data

#[cfg(test)]
mod tests {
    use csv_reconciler::config::{LocalLayout, RemoteLayout};
    use csv_reconciler::core::{InMemoryLedger, SettlementSenderRules};
    use csv_reconciler::notify::{Notification, Notifier};
    use csv_reconciler::orchestrator::ImportOrchestrator;
    use csv_reconciler::pipeline::LedgerRowPipeline;
    use csv_reconciler::remote::{MirrorTransport, RemoteFileGateway};
    use csv_reconciler::types::{
        AccountTransfer, FileState, LedgerAccount, ReconcileError, SettlementHeader,
        TransferState,
    };
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const INBOUND: &str = "data/files/csv";
    const REPORTS: &str = "data/files/batch_processed";

    type Orchestrator = ImportOrchestrator<
        MirrorTransport,
        LedgerRowPipeline<InMemoryLedger, SettlementSenderRules>,
        RecordingNotifier,
    >;

    /// Notifier that keeps every notification it is asked to send
    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn send_import_feedback(&self, notification: &Notification) -> Result<(), ReconcileError> {
            self.sent.borrow_mut().push(notification.clone());
            Ok(())
        }
    }

    /// Ledger with one customer account and two existing transfers
    ///
    /// Transfer 41 is pending, transfer 42 is already completed.
    fn seeded_ledger() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        ledger.add_account(LedgerAccount::new("000000001", "Max Mustermann"));
        for (id, state) in [(41, TransferState::Pending), (42, TransferState::Completed)] {
            ledger
                .insert_account_transfer(AccountTransfer {
                    id: Some(id),
                    sender_account_no: "000000001".to_string(),
                    receiver_account_no: Some("000000002".to_string()),
                    amount: Decimal::new(5, 0),
                    subject: "Depot".to_string(),
                    value_date: None,
                    state,
                })
                .unwrap();
        }
        ledger
    }

    /// Remote store and local staging area of one test
    struct Harness {
        remote: TempDir,
        local: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let harness = Harness {
                remote: TempDir::new().expect("Failed to create remote dir"),
                local: TempDir::new().expect("Failed to create local dir"),
            };
            fs::create_dir_all(harness.remote.path().join(INBOUND))
                .expect("Failed to create inbound dir");
            harness
        }

        fn layout(&self) -> LocalLayout {
            LocalLayout::new(self.local.path())
        }

        /// Put a file on the remote store, optionally with its readiness marker
        fn stage(&self, name: &str, content: &[u8], ready: bool) {
            let inbound = self.remote.path().join(INBOUND);
            fs::write(inbound.join(name), content).expect("Failed to stage file");
            if ready {
                fs::write(inbound.join(format!("{}.start", name)), "")
                    .expect("Failed to stage marker");
            }
        }

        fn stage_fixture(&self, fixture: &str, name: &str) {
            let input = format!("tests/fixtures/{}/input.csv", fixture);
            let content = fs::read(&input).unwrap_or_else(|e| panic!("{}: {}", input, e));
            self.stage(name, &content, true);
        }

        fn remote_path(&self, dir: &str, name: &str) -> PathBuf {
            self.remote.path().join(dir).join(name)
        }

        fn download_path(&self, name: &str) -> PathBuf {
            self.layout().download_dir().join(name)
        }

        fn settlement_files(&self) -> Vec<PathBuf> {
            match fs::read_dir(self.layout().settlement_dir()) {
                Ok(entries) => {
                    let mut files: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
                    files.sort();
                    files
                }
                Err(_) => Vec::new(),
            }
        }

        fn orchestrator(&self, ledger: InMemoryLedger) -> Orchestrator {
            let local = self.layout();
            let pipeline = LedgerRowPipeline::new(
                ledger,
                SettlementSenderRules,
                SettlementHeader::default(),
                local.settlement_dir(),
            );
            let gateway = RemoteFileGateway::new(
                MirrorTransport::new(self.remote.path()),
                RemoteLayout::default(),
                local.download_dir(),
            );
            ImportOrchestrator::new(gateway, pipeline, RecordingNotifier::default(), local)
        }
    }

    /// Run a fixture as the only remote file and check its outcome
    #[rstest]
    #[case::invalid_transaction_key("invalid_transaction_key")]
    #[case::account_transfer("account_transfer")]
    #[case::complete_pending_transfer("complete_pending_transfer")]
    #[case::transfer_not_pending("transfer_not_pending")]
    #[case::transfer_not_found("transfer_not_found")]
    #[case::bank_transfer("bank_transfer")]
    #[case::bank_transfer_rejected("bank_transfer_rejected")]
    #[case::debit_collection("debit_collection")]
    #[case::invalid_settlement_sender("invalid_settlement_sender")]
    #[case::stops_at_first_error("stops_at_first_error")]
    #[case::missing_amount("missing_amount")]
    #[case::malformed_header("malformed_header")]
    fn test_fixture(#[case] fixture: &str) {
        let harness = Harness::new();
        harness.stage_fixture(fixture, "mraba.csv");
        let expected_path = format!("tests/fixtures/{}/expected.txt", fixture);
        let expected = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("{}: {}", expected_path, e))
            .trim_end()
            .replace(
                "{path}",
                &harness.download_path("mraba.csv").display().to_string(),
            );

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        let report = orchestrator
            .run_transfer_and_import(true)
            .expect("Run failed");

        assert_eq!(report.files.len(), 1);
        let file = &report.files[0];
        assert_eq!(file.name, "mraba.csv");
        assert_eq!(file.state, FileState::Reported);
        let result = file.result.as_ref().expect("File was not processed");

        assert!(!harness.remote_path(INBOUND, "mraba.csv.start").exists());
        let sent = orchestrator.notifier().sent.borrow();
        assert_eq!(sent.len(), 1);

        if expected == "Success" {
            assert!(result.is_success(), "unexpected errors: {}", result.summary());
            assert!(!harness.download_path("mraba.csv").exists());
            assert!(!harness.remote_path(REPORTS, "mraba.csv").exists());
            assert_eq!(sent[0], Notification::success("mraba.csv"));
        } else {
            assert_eq!(result.summary(), expected);
            assert!(harness.download_path("mraba.csv").exists());
            let uploaded = fs::read_to_string(harness.remote_path(REPORTS, "mraba.csv"))
                .expect("Error report was not uploaded");
            assert_eq!(uploaded, expected);
            assert_eq!(sent[0].subject, "Import CSV failed");
            assert_eq!(
                sent[0].body,
                format!("Import of the file mraba.csv failed with errors:\n{}", expected)
            );
            assert!(harness.settlement_files().is_empty());
        }
    }

    #[test]
    fn test_only_marked_csv_entries_are_fetched() {
        let harness = Harness::new();
        harness.stage_fixture("account_transfer", "mraba.csv");
        harness.stage("blubb.csv", b"ACTIVITY_ID\n", false);

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        let report = orchestrator.run_transfer_and_import(false).unwrap();

        let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["mraba.csv"]);
        assert!(harness.remote_path(INBOUND, "blubb.csv").exists());
        assert!(!harness.download_path("blubb.csv").exists());
        assert!(orchestrator.notifier().sent.borrow().is_empty());
    }

    #[test]
    fn test_account_transfer_is_booked_pending() {
        let harness = Harness::new();
        harness.stage_fixture("account_transfer", "mraba.csv");

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        orchestrator.run_transfer_and_import(false).unwrap();

        let ledger = orchestrator.into_pipeline().into_ledger();
        let transfers = ledger.account_transfers();
        assert_eq!(transfers.len(), 3);
        let booked = transfers[2];
        assert_eq!(booked.state, TransferState::Pending);
        assert_eq!(booked.amount, Decimal::new(1250, 2));
        assert_eq!(booked.subject, "MieteJanuar");
        assert_eq!(booked.receiver_account_no.as_deref(), Some("000000002"));
    }

    #[test]
    fn test_referenced_transfer_is_completed() {
        let harness = Harness::new();
        harness.stage_fixture("complete_pending_transfer", "mraba.csv");

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        orchestrator.run_transfer_and_import(false).unwrap();

        let ledger = orchestrator.into_pipeline().into_ledger();
        let transfers = ledger.account_transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].id, Some(41));
        assert_eq!(transfers[0].state, TransferState::Completed);
        assert_eq!(transfers[0].subject, "Depotauszahlung");
    }

    #[test]
    fn test_debit_collection_writes_settlement_batch() {
        let harness = Harness::new();
        harness.stage_fixture("debit_collection", "mraba.csv");

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        orchestrator.run_transfer_and_import(false).unwrap();

        let files = harness.settlement_files();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("DTAUS"));
        assert!(name.ends_with("_201_mraba.csv"));

        let content = fs::read_to_string(&files[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "RS;8888888888;99999999;Credit collection;1;10.00",
                "0101881952;30020900;Max Mustermann;10.00;Subject",
            ]
        );
    }

    #[test]
    fn test_latin1_input_is_decoded() {
        let harness = Harness::new();
        let mut content = b"ACTIVITY_ID;UMSATZ_KEY;SENDER_BLZ;SENDER_KONTO;SENDER_NAME;RECEIVER_BLZ;AMOUNT;DESC1\n"
            .to_vec();
        content.extend_from_slice(b"1;16;30020900;0101881952;Max M\xfcstermann;70022200;10;Beitrag\n");
        harness.stage("mraba.csv", &content, true);

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        let report = orchestrator.run_transfer_and_import(false).unwrap();

        assert!(report.is_success());
        let files = harness.settlement_files();
        let batch = fs::read_to_string(&files[0]).unwrap();
        assert!(batch.contains("0101881952;30020900;Max Mustermann;10.00;Beitrag"));
    }

    #[test]
    fn test_failed_file_abandons_rest_of_run() {
        let harness = Harness::new();
        harness.stage_fixture("invalid_transaction_key", "a.csv");
        harness.stage_fixture("account_transfer", "b.csv");

        let mut orchestrator = harness.orchestrator(seeded_ledger());
        let report = orchestrator.run_transfer_and_import(true).unwrap();

        assert_eq!(report.failed_file().map(|f| f.name.as_str()), Some("a.csv"));
        assert_eq!(report.files[1].name, "b.csv");
        assert_eq!(report.files[1].state, FileState::Downloaded);
        assert_eq!(report.files[1].result, None);

        assert!(harness.download_path("b.csv").exists());
        assert!(!harness.remote_path(INBOUND, "b.csv.start").exists());
        assert!(!harness.remote_path(REPORTS, "b.csv").exists());
        assert_eq!(orchestrator.notifier().sent.borrow().len(), 1);

        let ledger = orchestrator.into_pipeline().into_ledger();
        assert_eq!(ledger.account_transfers().len(), 2);
    }

    #[test]
    fn test_validation_only_is_idempotent() {
        let harness = Harness::new();
        let input = PathBuf::from("tests/fixtures/stops_at_first_error/input.csv");
        let mut orchestrator = harness.orchestrator(seeded_ledger());

        let first = orchestrator.run_validation_only(&input);
        let second = orchestrator.run_validation_only(&input);

        assert_eq!(first, second);
        assert_eq!(
            first.summary(),
            "Imported: 1 Errors: 2: Account 000000009 not found"
        );
        assert!(input.exists());
        assert!(orchestrator.notifier().sent.borrow().is_empty());

        let ledger = orchestrator.into_pipeline().into_ledger();
        assert_eq!(ledger.account_transfers().len(), 2);
    }

    #[test]
    fn test_validation_only_writes_no_settlement_batch() {
        let harness = Harness::new();
        let input = PathBuf::from("tests/fixtures/debit_collection/input.csv");
        let mut orchestrator = harness.orchestrator(seeded_ledger());

        let result = orchestrator.run_validation_only(&input);

        assert!(result.is_success());
        assert!(harness.settlement_files().is_empty());
    }

    #[test]
    fn test_empty_inbound_directory() {
        let harness = Harness::new();
        let mut orchestrator = harness.orchestrator(seeded_ledger());

        let report = orchestrator.run_transfer_and_import(true).unwrap();

        assert!(report.files.is_empty());
        assert!(harness.layout().download_dir().is_dir());
        assert!(harness.layout().upload_dir().is_dir());
    }
}
