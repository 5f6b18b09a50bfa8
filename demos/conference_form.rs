use formfill::{
    compile, CdpSession, CheckboxField, FillOptions, FormSchema, RadioField, TextField,
};

#[tokio::main]
async fn main() -> formfill::Result<()> {
    tracing_subscriber::fmt().init();

    let schema = FormSchema {
        url: Some("https://forms.gle/z6wBJuZgUuUfbvzV7".into()),
        text: vec![
            TextField {
                label: "Email".into(),
                types: vec!["text".into(), "email".into()],
                response: "alex.johnson@example.com".into(),
                textarea: None,
            },
            TextField {
                label: "Full Name".into(),
                types: vec!["text".into()],
                response: "Alex Johnson".into(),
                textarea: None,
            },
            TextField {
                label: "Registration ID".into(),
                types: vec!["text".into()],
                response: "REG-2025-001".into(),
                textarea: None,
            },
            TextField {
                label: "Organization".into(),
                types: vec!["text".into()],
                response: "Tech Research Labs".into(),
                textarea: None,
            },
            TextField {
                label: "Ticket Reference".into(),
                types: vec!["text".into()],
                response: "CONF-2025-STD-001".into(),
                textarea: None,
            },
        ],
        radio: vec![RadioField {
            label: "Ticket Type".into(),
            choice: "Standard".into(),
            choice_count: Some(1),
        }],
        checkbox: vec![CheckboxField {
            label: "Preferred Sessions".into(),
            choices: vec![
                "AI in Healthcare".into(),
                "Quantum Computing 101".into(),
            ],
        }],
    };

    let mapping = compile(&schema, false)?;
    let engine = CdpSession::builder().headless(false).build_engine().await?;
    let outcome = engine.fill(&mapping, &FillOptions::default()).await;

    match outcome.elapsed_secs() {
        Some(secs) => println!("Time taken: {secs:.2} seconds"),
        None => println!("Run did not complete"),
    }
    Ok(())
}
