use fibre_autowire::{arguments, resolve, Catalog, Container, Parameter, TypeDescriptor};

// One implementation, configured two ways through argument overrides.
struct MessageSender {
  channel: String,
  retries: i64,
}

impl MessageSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending {} to {} (retries: {}): '{}'", self.channel, to, self.retries, message)
  }
}

fn main() {
  // --- Registration ---
  let catalog = Catalog::new().with(
    TypeDescriptor::concrete("MessageSender", |args| {
      Ok(MessageSender {
        channel: args.string("channel")?,
        retries: args.int("retries")?,
      })
    })
    .param(Parameter::new("channel"))
    .param(Parameter::new("retries").with_default(3)),
  );
  let container = Container::new(catalog);

  // Each binding carries its own overrides, so each gets its own instance.
  container.bind_with_arguments("email", "MessageSender", arguments! { "channel" => "email" });
  container.bind_with_arguments(
    "sms",
    "MessageSender",
    arguments! { "channel" => "SMS", "retries" => 0 },
  );

  // --- Resolution ---
  let email_notifier = resolve!(container, MessageSender, "email");
  let sms_notifier = resolve!(container, MessageSender, "sms");

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result1.contains("retries: 3"));
  assert!(result2.contains("SMS"));
  assert!(result2.contains("retries: 0"));
}
