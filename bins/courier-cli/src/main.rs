use courier_api::types::AgentIdentity;
use courier_core::agents::AgentDirectory;
use courier_core::config::CoreConfig;
use courier_core::ids::InboxId;
use courier_core::mentions::extract_mentions;
use courier_core::messaging::MockMessaging;
use courier_core::resolve::{NullEnsResolver, NullFarcasterResolver};
use courier_core::Core;
use std::sync::Arc;

fn demo_directory() -> AgentDirectory {
    AgentDirectory::new(vec![AgentIdentity {
        id: "helper".to_string(),
        handle: "helper".to_string(),
        display_name: "Courier Helper".to_string(),
        wallet_address: "0x00000000000000000000000000000000000000fe".to_string(),
        avatar_url: None,
        description: Some("Loopback demo agent".to_string()),
    }])
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let mut config = CoreConfig::default();
    config.storage_path = ".courier-cli".to_string();
    config.namespace = "cli".to_string();
    let messaging = MockMessaging::new();
    let core = Core::init(
        config,
        Arc::new(NullEnsResolver),
        Arc::new(NullFarcasterResolver),
        demo_directory(),
        Arc::new(messaging.clone()),
    )
    .await
    .expect("cli init");
    match command {
        "mentions" => {
            if args.len() < 3 {
                eprintln!("usage: courier-cli mentions <text>");
                return;
            }
            let text = args[2..].join(" ");
            let tokens = extract_mentions(&text);
            if tokens.is_empty() {
                println!("no mentions");
                return;
            }
            for token in tokens {
                println!("{} {} {}", token.index, token.raw, token.username);
            }
        }
        "resolve" => {
            if args.len() < 3 {
                eprintln!("usage: courier-cli resolve <token>");
                return;
            }
            match core.resolve_input(&args[2]).await {
                Ok(target) => match target.identity {
                    Some(identity) => println!(
                        "{} {:?} {}",
                        identity.display_label,
                        identity.source,
                        target.address
                    ),
                    None => println!("{} (raw address)", target.address),
                },
                Err(err) => {
                    eprintln!("error {:?}", err);
                    if let Some(guidance) = err.user_message() {
                        eprintln!("{}", guidance);
                    }
                }
            }
        }
        "dm" => {
            if args.len() < 4 {
                eprintln!("usage: courier-cli dm <token> <text>");
                return;
            }
            let text = args[3..].join(" ");
            let target = match core.resolve_input(&args[2]).await {
                Ok(target) => target,
                Err(err) => {
                    eprintln!("error {:?}", err);
                    return;
                }
            };
            // loopback network: make the target known so creation succeeds
            messaging
                .register_identity(&target.address, InboxId::new(format!("inbox-{}", target.address)))
                .await;
            match core.find_or_create_conversation(&target.address).await {
                Ok(conversation) => match core.send_message(&conversation.id, &text).await {
                    Ok(message_id) => {
                        println!("conversation {}", conversation.id.value);
                        println!("sent {}", message_id);
                    }
                    Err(err) => eprintln!("error {:?}", err),
                },
                Err(err) => {
                    eprintln!("error {:?}", err);
                    if let Some(guidance) = err.user_message() {
                        eprintln!("{}", guidance);
                    }
                }
            }
        }
        _ => {
            eprintln!("usage: courier-cli <mentions|resolve|dm> ...");
        }
    }
    core.shutdown().await;
}
