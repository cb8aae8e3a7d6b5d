use std::fs;

use epigrad::{gradcheck, loss, solve, timing, EpigradError, SolveConfig};
use plotly::{common::Mode, layout::Axis, layout::Layout, Plot, Scatter};

fn main() -> Result<(), EpigradError> {
    let config = SolveConfig::default();

    // Forward solve, sampled once per time unit.
    let trajectory = solve(&config)?;
    println!(
        "solved SIR with beta = {}, gamma = {} over t = {}..{} ({} samples)",
        config.params.beta,
        config.params.gamma,
        config.t0,
        config.t_final,
        trajectory.len()
    );
    println!("  t        S          I          R");
    for i in (0..trajectory.len()).step_by(20) {
        let [s, im, r] = trajectory.state(i);
        println!("{:>5.1}  {:>9.3}  {:>9.3}  {:>9.3}", trajectory.ts[i], s, im, r);
    }

    plot_trajectory(&trajectory)?;
    println!("wrote sir-trajectory.html");

    // Gradient-augmented evaluation of the sum-of-squares loss.
    let (l, grad) = loss::loss_and_gradient(&config)?;
    println!("loss = {l:.6e}");
    println!("dL/dbeta  = {:.6e}", grad[0]);
    println!("dL/dgamma = {:.6e}", grad[1]);

    // Forward vs gradient-augmented wall clock.
    let comparison = timing::compare(&config, 30)?;
    println!(
        "forward solve:  mean {:?} (min {:?}, max {:?})",
        comparison.forward.mean, comparison.forward.min, comparison.forward.max
    );
    println!(
        "gradient solve: mean {:?} (min {:?}, max {:?}), {:.2}x forward",
        comparison.gradient.mean,
        comparison.gradient.min,
        comparison.gradient.max,
        comparison.slowdown()
    );

    // Cross-check the analytic gradient against central finite differences.
    let settings = gradcheck::GradCheckSettings::default();
    let report = gradcheck::check(
        |p| loss::loss_at(&config, p),
        &config.params.to_vec(),
        &grad,
        &settings,
    )?;
    for (name, p) in ["beta", "gamma"].iter().zip(report.params.iter()) {
        println!(
            "gradcheck {name}: analytic {:.6e}, numerical {:.6e}, rel err {:.2e} -> {}",
            p.analytic,
            p.numerical,
            p.rel_err,
            if p.pass { "ok" } else { "FAILED" }
        );
    }
    if !report.pass() {
        println!("gradient check failed (eps = {}, atol = {})", settings.eps, settings.atol);
    }

    Ok(())
}

fn plot_trajectory(trajectory: &epigrad::Trajectory) -> Result<(), EpigradError> {
    let time = trajectory.ts.clone();
    let s_line = Scatter::new(time.clone(), trajectory.susceptible())
        .mode(Mode::Lines)
        .name("S");
    let i_line = Scatter::new(time.clone(), trajectory.infectious())
        .mode(Mode::Lines)
        .name("I");
    let r_line = Scatter::new(time, trajectory.recovered())
        .mode(Mode::Lines)
        .name("R");

    let mut plot = Plot::new();
    plot.add_trace(s_line);
    plot.add_trace(i_line);
    plot.add_trace(r_line);
    let layout = Layout::new()
        .x_axis(Axis::new().title("t"))
        .y_axis(Axis::new().title("population"));
    plot.set_layout(layout);

    let html = plot.to_inline_html(Some("sir-trajectory"));
    fs::write("sir-trajectory.html", html).expect("unable to write plot file");
    Ok(())
}
