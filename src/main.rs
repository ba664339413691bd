use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use loopvoice::audio::capture::MicSource;
use loopvoice::audio::playback::SpeakerSink;
use loopvoice::config::BackendConfig;
use loopvoice::controller::Phase;
use loopvoice::conversation::Role;
use loopvoice::transport::VoiceClient;
use loopvoice::VoiceController;

#[tokio::main]
async fn main() {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = BackendConfig::from_env();
    let client = VoiceClient::new(&config);

    // 2. Health badge: informational, rendered once at startup.
    match client.check_health().await {
        Ok(health) if health.is_healthy() => {
            println!(
                "Loop AI ready ({} hospitals indexed).",
                health.hospitals_indexed
            );
        }
        Ok(health) => println!("Backend status: {}.", health.status),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            println!("Backend starting or unavailable; you can still try asking.");
        }
    }

    let mut controller =
        VoiceController::new(client, Box::new(MicSource), Box::new(SpeakerSink::new()));

    println!("Press Enter to start/stop the mic. Ctrl-D or 'quit' to exit.");

    // 3. Drive: stdin gestures + a poll cadence for chunk delivery and
    // the automatic silence stop.
    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    let mut cadence = tokio::time::interval(Duration::from_millis(100));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cadence.tick() => {
                if controller.poll_capture() {
                    println!("(silence detected)");
                    finish_turn(&mut controller).await;
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "quit" | "exit" => break,
                    "" | "mic" | "start" | "stop" => match controller.state().phase() {
                        Phase::Idle => {
                            controller.start_capture();
                            match controller.state().phase() {
                                Phase::Recording => {
                                    println!("Recording... press Enter to stop.");
                                }
                                _ => print_last_error(&controller),
                            }
                        }
                        Phase::Recording => finish_turn(&mut controller).await,
                        Phase::Processing => println!("Still processing the last question."),
                    },
                    other => {
                        println!("Unknown command '{other}'. Press Enter to toggle the mic.");
                    }
                }
            }
        }
    }

    tracing::info!("Interface shutting down");
}

/// Run the stop gesture and print whatever came out of the exchange.
async fn finish_turn(controller: &mut VoiceController) {
    let seen = controller.conversation().len();
    println!("Processing...");
    controller.stop_capture().await;

    for entry in &controller.conversation()[seen..] {
        let who = match entry.role {
            Role::User => "You",
            Role::Assistant => "Loop AI",
        };
        println!("{who}: {}", entry.text);
    }
    print_last_error(controller);
}

fn print_last_error(controller: &VoiceController) {
    if let Some(err) = controller.state().last_error() {
        println!("! {err}");
    }
}
