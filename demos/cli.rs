use a1base_client_rs::{
    A1BaseClient, EmailHeaders, EmailRequest, Error, GroupMessageRequest, MessageRequest,
    ThreadResponse,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "a1base",
    about = "Send messages and browse threads through the A1Base API",
    arg_required_else_help = true
)]
struct Cli {
    #[arg(long, env = "A1BASE_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "A1BASE_API_SECRET", hide_env_values = true)]
    api_secret: String,

    #[arg(long, env = "A1BASE_BASE_URL", help = "API base URL (must be https)")]
    base_url: Option<String>,

    #[arg(short, long, required = true, help = "A1Base account ID")]
    account: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a message to one recipient
    Send {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "whatsapp")]
        service: String,
        #[arg(long)]
        attachment: Option<String>,
    },
    /// Post a message into a group thread
    SendGroup {
        #[arg(long)]
        from: String,
        #[arg(long)]
        thread: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "whatsapp")]
        service: String,
    },
    /// Send an email, or store it as a draft with --draft
    Email {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        cc: Vec<String>,
        #[arg(long)]
        reply_to: Option<String>,
        #[arg(long)]
        draft: bool,
    },
    /// List threads, optionally only those with a phone number
    Threads {
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show a thread and its messages
    Thread {
        #[arg(long)]
        id: String,
    },
    /// Show the latest messages of a thread
    Recent {
        #[arg(long)]
        thread: String,
    },
    /// Show one message
    Message {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let mut builder = A1BaseClient::builder()
        .api_key(cli.api_key)
        .api_secret(cli.api_secret);
    if let Some(url) = cli.base_url {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;
    let account = cli.account.as_str();

    match cli.command {
        Commands::Send {
            from,
            to,
            content,
            service,
            attachment,
        } => {
            let mut msg = MessageRequest::new(content, from, to, service);
            msg.attachment_uri = attachment;
            let resp = client.send_individual_message(account, &msg).await?;
            println!("{} -> {}: {}", resp.from, resp.to, resp.status);
            if let Some(note) = resp.message {
                println!("   {}", note);
            }
        }
        Commands::SendGroup {
            from,
            thread,
            content,
            service,
        } => {
            let msg = GroupMessageRequest::new(content, from, thread, service);
            let resp = client.send_group_message(account, &msg).await?;
            println!("thread {}: {}", resp.thread_id, resp.status);
        }
        Commands::Email {
            from,
            to,
            subject,
            body,
            cc,
            reply_to,
            draft,
        } => {
            let mut email = EmailRequest::new(from, to, subject, body);
            if !cc.is_empty() || reply_to.is_some() {
                email = email.with_headers(EmailHeaders {
                    cc,
                    bcc: Vec::new(),
                    reply_to,
                });
            }
            let resp = if draft {
                client.create_email(account, &email).await?
            } else {
                client.send_email(account, &email).await?
            };
            println!("{} -> {} \"{}\": {}", resp.from, resp.to, resp.subject, resp.status);
        }
        Commands::Threads { phone } => {
            let threads = match phone {
                Some(phone) => client.get_all_threads_by_phone(account, &phone).await?,
                None => client.get_all_threads(account).await?,
            };
            if threads.is_empty() {
                println!("No threads found.");
            }
            for (idx, thread) in threads.iter().enumerate() {
                println!("{}. {} ({})", idx + 1, thread.id, thread.thread_type);
                println!("   Participants: {}", thread.participants.join(", "));
            }
        }
        Commands::Thread { id } => {
            let thread = client.get_thread_details(account, &id).await?;
            print_thread(&thread);
        }
        Commands::Recent { thread } => {
            let messages = client.get_recent_messages(account, &thread).await?;
            for msg in messages {
                println!("[{}] {}: {}", msg.timestamp, msg.sender_number, msg.content);
            }
        }
        Commands::Message { id } => {
            let msg = client.get_message_details(account, &id).await?;
            println!("ID: {}", msg.id);
            println!("Thread: {}", msg.thread_id);
            println!("From: {} {}", msg.sender_name, msg.sender_number);
            if let Some(status) = msg.status {
                println!("Status: {}", status);
            }
            println!("{}", msg.content);
        }
    }

    Ok(())
}

fn print_thread(thread: &ThreadResponse) {
    println!("Thread {} ({})", thread.id, thread.thread_type);
    println!("Participants: {}", thread.participants.join(", "));
    println!("Created: {}  Updated: {}", thread.created_at, thread.updated_at);
    for msg in &thread.messages {
        println!("[{}] {}: {}", msg.timestamp, msg.sender_number, msg.content);
    }
}
