use fibre_autowire::{resolve, Catalog, Container, Parameter, TypeDescriptor};
use std::rc::Rc;

// 1. Define the abstraction (the trait)
trait Logger {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Rc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    // ... logic to generate report ...
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  // --- Registration ---

  // The logger is built as an `Rc<dyn Logger>` so dependents can take it as a
  // trait object. Nothing binds "Logger": the failsafe container discovers
  // ConsoleLogger as its only implementation.
  let catalog = Catalog::new()
    .with(TypeDescriptor::abstraction("Logger"))
    .with(
      TypeDescriptor::concrete("ConsoleLogger", |_| Ok(Rc::new(ConsoleLogger) as Rc<dyn Logger>))
        .implements("Logger"),
    )
    .with(
      TypeDescriptor::of(|args| {
        Ok(ReportService {
          logger: (*args.instance::<Rc<dyn Logger>>("logger")?).clone(),
        })
      })
      .param(Parameter::new("logger").typed("Logger")),
    );

  let container = Container::failsafe(catalog);

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, ReportService);

  println!("Using the service...");
  report_service.generate_report();

  // The discovered logger is now bound and shared.
  assert!(container.has("Logger"));
}
