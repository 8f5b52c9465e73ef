//! Memory watch: Load a simulated target, change it, and print highlights.
//!
//! Run with `RUST_LOG=memline=debug cargo run --example memory_watch` to see
//! the tracker's logging.

use memline::source::{InMemoryExtendedBlock, SharedMemory};
use memline::{
    Address, BlockId, Error, MemoryContext, MemoryEvent, MemorySource, MemoryTab, Preferences,
    RenderingHost, TargetId, TargetStatus,
};
use tracing_subscriber::EnvFilter;

const BLOCK: BlockId = BlockId(1);
const TARGET: TargetId = TargetId(1);

/// Host that only reports what it is told.
#[derive(Default)]
struct ConsoleHost {
    showing_error: bool,
}

impl RenderingHost for ConsoleHost {
    fn display_error(&mut self, error: &Error) {
        self.showing_error = true;
        println!("!! {error}");
    }

    fn display_table(&mut self) {
        self.showing_error = false;
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_displaying_error(&self) -> bool {
        self.showing_error
    }

    fn refresh(&mut self) {
        tracing::info!("refresh requested");
    }
}

fn print_tab(tab: &MemoryTab<ConsoleHost>) {
    println!("-- {} --", tab.label());
    for row in tab.rows() {
        let marks: String = row
            .changed
            .iter()
            .map(|changed| if *changed { '^' } else { ' ' })
            .collect();
        println!("{}  {}  {}", row.address, row.columns.join(" "), marks);
    }
    println!();
}

fn main() -> memline::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut context = MemoryContext::init(Preferences::default())?;

    let memory = SharedMemory::new(0x2000, b"memline demo: watching memory change".to_vec());
    let source = MemorySource::extended(BLOCK, TARGET, InMemoryExtendedBlock::new(memory.clone()));
    let mut hex = MemoryTab::new(&mut context, source, ConsoleHost::default(), "hex")?;
    hex.tracker_mut().input_mut().starting_address = Some(Address::from(0x2000u64));
    hex.tracker_mut().input_mut().visible_lines = 3;
    hex.tracker_mut().input_mut().default_buffer_size = 0;

    let _ = hex.load();
    print_tab(&hex);

    // Target runs, stops again with different memory
    memory.write(0x2008, b"DEMO");
    memory.write(0x2021, &[0x00, 0x7F]);
    context.publish(MemoryEvent::Suspended { target: TARGET });
    hex.pump_events();
    print_tab(&hex);

    // Reads start failing
    memory.fail_with("target not responding");
    context.publish(MemoryEvent::ContentChanged { block: BLOCK });
    hex.pump_events();
    print_tab(&hex);

    memory.clear_failure();
    memory.set_status(TargetStatus::Terminated);
    context.publish(MemoryEvent::ContentChanged { block: BLOCK });
    hex.pump_events();
    println!("target terminated, {} lines kept", hex.rows().len());

    hex.close(&mut context);
    context.shutdown();
    Ok(())
}
