use std::{cell::RefCell, rc::Rc, str::from_utf8};

use branch_ledger::{
    bank::BankConfig,
    bin_utils::{Report, Service, rejection_message},
    transaction::TransactionKind,
};
use chrono::NaiveDate;

const TEST_FILE: &str = include_str!("journal.csv");

fn run(report: Report) -> (String, Vec<String>) {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let mut output = Vec::new();
    let service = Service {
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        config: BankConfig::default(),
        report,
        error_printer: Box::new(move |_line, err| sink.borrow_mut().push(err.to_string())),
    };
    service.run().unwrap();
    let output = from_utf8(&output).unwrap().to_string();
    let errors = errors.borrow().clone();
    (output, errors)
}

#[test]
fn replay_journal_summary() {
    let (output, errors) = run(Report::Summary);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "branch,account,holder,legal_id,balance,transactions",
            "0001,1,João Silva,123.456.789-01,1200.00,4",
            "0001,2,Maria Oliveira,987.654.321-01,200.00,5",
        ]
    );
    assert_eq!(
        errors,
        vec![
            "A client with CPF 123.456.789-01 already exists",
            "Amount exceeds the limit of R$ 500.00 per withdrawal",
            "Daily limit of 3 withdrawals reached",
        ]
    );
}

#[test]
fn replay_journal_statement() {
    let (output, _) = run(Report::Statement {
        account: 1,
        kind: Some(TransactionKind::Withdrawal),
    });
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "kind,amount,occurred_at,balance_after",
            "withdrawal,200.00,2025-06-14T09:10:00,800.00",
            "withdrawal,100.00,2025-06-14T09:30:00,1200.00",
        ]
    );
}

#[test]
fn statement_for_unknown_account_fails() {
    let mut output = Vec::new();
    let service = Service {
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        config: BankConfig::default(),
        report: Report::Statement {
            account: 42,
            kind: None,
        },
        error_printer: Box::new(|_, _| {}),
    };
    assert!(service.run().is_err());
}

#[test]
fn replay_journal_clients() {
    let (output, _) = run(Report::Clients);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "legal_id,name,birth_date,address,accounts",
            "123.456.789-01,João Silva,01/01/1990,\"Rua A, 123 - Centro - São Paulo/SP\",1",
            "987.654.321-01,Maria Oliveira,15/05/1990,\"Av. Paulista, 456 - Bela Vista - São Paulo/SP\",1",
            "111.222.333-44,Ana Souza,20/02/2000,Rua C,0",
        ]
    );
}

#[test]
fn replay_journal_text_report() {
    let (output, _) = run(Report::Text {
        account: 2,
        kind: None,
        on: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
    });
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Account 0001/2 - Maria Oliveira - CPF: 987.654.321-01",
            "14/06/2025 10:00:00 - Deposit: R$ 1000.00",
            "14/06/2025 10:05:00 - Withdrawal: R$ 500.00",
            "14/06/2025 10:15:00 - Withdrawal: R$ 100.00",
            "14/06/2025 10:20:00 - Withdrawal: R$ 100.00",
            "15/06/2025 09:00:00 - Withdrawal: R$ 100.00",
            "Balance: R$ 200.00",
            "Transactions on 15/06/2025: 1",
            "Withdrawals left on 15/06/2025: 2",
        ]
    );
}

#[test]
fn unknown_parties_are_reported_with_line_numbers() {
    let journal = "action,legal_id,name,birth_date,address,account,amount,at\n\
                   open,99999999999,,,,,,\n\
                   select,,,,,7,,\n\
                   deposit,,,,,,10.00,2025-06-14T09:00:00\n\
                   register,11111111111,Ana Souza,20/02/2000,Rua C,,,\n\
                   deposit,11111111111,,,,7,10.00,2025-06-14T09:00:00\n\
                   open,11111111111,,,,,,\n\
                   register,22222222222,Bruno Lima,03/03/1993,Rua D,,,\n\
                   deposit,22222222222,,,,1,10.00,2025-06-14T09:00:00\n";
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let mut output = Vec::new();
    let service = Service {
        input: journal.as_bytes(),
        output: &mut output,
        config: BankConfig::default(),
        report: Report::Summary,
        error_printer: Box::new(move |line, err| {
            sink.borrow_mut().push(rejection_message(line, &err))
        }),
    };
    service.run().unwrap();
    assert_eq!(
        *errors.borrow(),
        vec![
            "Error at line 2: No client with CPF 999.999.999-99",
            "Error at line 3: No account number 7",
            "Error at line 4: No account selected",
            "Error at line 6: No account number 7",
            "Error at line 9: Account 1 does not belong to the client",
        ]
    );
}
