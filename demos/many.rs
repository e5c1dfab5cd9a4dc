use hungarian_trace::Allocations;

const AGENTS: usize = 48;
const TASKS: usize = 64;
const N: usize = 100;

fn main() {
    let mut assignments = Allocations::default();
    let mut total_cost = 0.;
    for _ in 0..N {
        // more tasks than agents, so every solve pads dummy rows
        let costs = nalgebra::DMatrix::<f64>::new_random(AGENTS, TASKS);
        hungarian_trace::hungarian(&costs, &mut assignments).expect("random costs are valid");
        assert_eq!(assignments.len(), AGENTS);
        total_cost += assignments
            .iter()
            .map(|a| costs.get(a.assignment()).expect("within cost bounds"))
            .sum::<f64>();
    }

    println!("total: {total_cost}");
}
