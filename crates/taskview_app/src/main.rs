use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Local;
use taskview_app::logging::{initialize, LogDestination};
use taskview_app::{TaskListController, TextListAdapter};
use taskview_bridge::{TaskQueue, UiTask, WorkerQueue};
use view_logging::view_info;

/// Terminal demo: a handful of background tasks reporting progress into a
/// live task list on the main thread.
fn main() -> Result<()> {
    initialize(LogDestination::File);

    let queue = Arc::new(WorkerQueue::new());
    let mut controller = TaskListController::new(
        queue.clone() as Arc<dyn TaskQueue>,
        TextListAdapter::new(),
    );

    let completed = Arc::new(AtomicUsize::new(0));
    let mut ui_tasks = Vec::new();

    let mut spawn = |name: &str,
                     pauseable: bool,
                     body: Box<dyn FnOnce(&taskview_bridge::TaskContext) + Send>|
     -> Result<()> {
        let done = completed.clone();
        let label = name.to_string();
        let mut ui_task = UiTask::new(
            name,
            body,
            move || {
                done.fetch_add(1, Ordering::SeqCst);
                view_info!("'{}' finished at {}", label, Local::now().format("%H:%M:%S"));
            },
            controller.hub(),
        );
        let task = ui_task
            .task()
            .ok_or_else(|| anyhow!("task body already taken"))?;
        queue.submit(ui_task.task_name(), pauseable, task)?;
        ui_tasks.push(ui_task);
        Ok(())
    };

    spawn(
        "Sync catalogue",
        false,
        Box::new(|ctx| {
            for step in 0..=5 {
                ctx.set_progress(step * 20);
                ctx.set_message(format!("synced {} of 5 shards", step));
                thread::sleep(Duration::from_millis(40));
            }
        }),
    )?;

    spawn(
        "Rebuild index",
        true,
        Box::new(|ctx| {
            let mut done = 0;
            while done < 100 {
                if ctx.is_paused() {
                    thread::sleep(Duration::from_millis(20));
                    continue;
                }
                done += 10;
                ctx.set_progress(done);
                ctx.set_message(format!("indexing, {} percent", done));
                thread::sleep(Duration::from_millis(30));
            }
        }),
    )?;

    spawn(
        "Verify archive",
        false,
        Box::new(|ctx| {
            ctx.set_message("checking signatures");
            thread::sleep(Duration::from_millis(150));
            ctx.set_message("all signatures valid");
        }),
    )?;

    let task_count = ui_tasks.len();
    while completed.load(Ordering::SeqCst) < task_count {
        if controller.pump_timeout(Duration::from_millis(100)) {
            print_list(&controller);
        }
    }

    // One final pass to pick up the terminal status of every task.
    controller.refresh();
    print_list(&controller);

    queue.view_task_status(&mut |statuses| {
        if let Ok(dump) = serde_json::to_string_pretty(statuses) {
            view_info!("final statuses: {}", dump);
        }
    });

    queue.stop();
    Ok(())
}

fn print_list(controller: &TaskListController<TextListAdapter>) {
    println!("--- task list ---");
    for line in controller.adapter().lines() {
        println!("{}", line);
    }
}
