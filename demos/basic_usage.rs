use shadow_rust::{
    make_load_options, make_prediction_options, serialize, Model, PredictionEngine, Record,
    ShadowResult,
};

/// Stand-in engine that answers every prediction with the options it received.
struct EchoEngine;

impl PredictionEngine for EchoEngine {
    type Handle = String;

    fn load_model(&self, location: &str) -> ShadowResult<String> {
        Ok(location.to_owned())
    }

    fn predict(&self, handle: &String, input: &str, options: &str) -> ShadowResult<String> {
        Ok(format!(
            r#"{{"model":{:?},"input":{},"options":{}}}"#,
            handle, input, options
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let load_options = make_load_options("https://example.com/model.bin")?;
    println!("Loading model from: {}", load_options.location());
    let model = Model::load(EchoEngine, &load_options)?;

    let options = make_prediction_options(true, Some(0.75))?;
    println!("Options payload: {}", serialize(&options).to_json());

    let mut record = Record::new();
    record.insert("age".to_owned(), 63.0f32.into());
    record.insert("gender".to_owned(), "male".into());

    let output = model.predict(&record, &options)?;
    println!("Prediction: {}", output);

    let defaults = make_prediction_options(false, None)?;
    println!("Default payload: {}", serialize(&defaults).to_json());

    Ok(())
}
