// crates/mh_diagnostics/tests/diffusion_module.rs

//! 扩散量输出模块行为测试

mod common;

use common::*;
use mh_config::ParamValue;
use mh_diagnostics::{OutputModule, VtkDiffusionModule};

fn process(m: &mut VtkDiffusionModule<f64>, e: &StubElement) {
    OutputModule::<StubElement>::process_element(m, e);
}

fn commit(m: &VtkDiffusionModule<f64>, w: &mut dyn mh_io::OutputWriter) {
    OutputModule::<StubElement>::commit_buffers(m, w);
}

#[test]
fn test_buffer_exists_iff_flag_enabled() {
    for bits in 0..16u8 {
        let (t, d, e, gate) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
        let mut m = module(t, d, e, gate);
        m.alloc(5);

        assert_eq!(m.tortuosity().is_some(), t, "bits={bits:04b}");
        assert_eq!(m.diffusion_coefficient().is_some(), d, "bits={bits:04b}");
        assert_eq!(m.effective_diffusion_coefficient().is_some(), e, "bits={bits:04b}");

        if let Some(tau) = m.tortuosity() {
            assert_eq!(tau.len(), LAYOUT.num_phases);
            assert!(tau.iter().all(|v| v.len() == 5 && v.iter().all(|x| *x == 0.0)));
        }
        if let Some(dc) = m.diffusion_coefficient() {
            assert_eq!(dc.len(), LAYOUT.num_phases);
            assert!(dc.iter().all(|p| p.len() == LAYOUT.num_components));
            assert!(dc.iter().flatten().all(|v| v.len() == 5 && v.iter().all(|x| *x == 0.0)));
        }
    }
}

#[test]
fn test_flag_is_frozen_after_first_resolution() {
    let reg = registry(true, false, false, true);
    let mut m = VtkDiffusionModule::<f64>::new(LAYOUT, reg.clone());
    assert!(m.flags().is_enabled("tortuosity"));

    reg.set("VtkWriteTortuosities", ParamValue::Bool(false)).unwrap();
    reg.set("VtkWriteDiffusionCoefficients", ParamValue::Bool(true))
        .unwrap();
    assert!(m.flags().is_enabled("tortuosity"));

    m.alloc(3);
    assert!(m.tortuosity().is_some());
    // 首次查询发生在修改之后，读到新值
    assert!(m.diffusion_coefficient().is_some());
}

#[test]
fn test_gate_off_leaves_buffers_untouched() {
    let mut m = module(true, true, true, false);
    m.alloc(4);
    let before = (
        m.tortuosity().cloned(),
        m.diffusion_coefficient().cloned(),
        m.effective_diffusion_coefficient().cloned(),
    );

    process(&mut m, &StubElement::uniform(&[0, 1, 2, 3], ConstIq::default()));

    let after = (
        m.tortuosity().cloned(),
        m.diffusion_coefficient().cloned(),
        m.effective_diffusion_coefficient().cloned(),
    );
    assert_eq!(before, after);
}

#[test]
fn test_enabled_values_are_materialized() {
    let mut m = module(true, true, true, true);
    m.alloc(3);
    process(&mut m, &StubElement::uniform(&[1], ConstIq::default()));

    let tau = m.tortuosity().unwrap();
    for phase in tau {
        assert_eq!(phase, &vec![0.0, TORTUOSITY, 0.0]);
    }
    let dc = m.diffusion_coefficient().unwrap();
    let deff = m.effective_diffusion_coefficient().unwrap();
    for p in 0..LAYOUT.num_phases {
        for c in 0..LAYOUT.num_components {
            assert_eq!(dc[p][c], vec![0.0, DIFFUSION, 0.0]);
            assert_eq!(deff[p][c], vec![0.0, EFFECTIVE, 0.0]);
        }
    }
}

#[test]
fn test_only_enabled_quantity_is_written() {
    let mut m = module(false, true, false, true);
    m.alloc(2);
    process(&mut m, &StubElement::uniform(&[0, 1], ConstIq::default()));

    assert!(m.tortuosity().is_none());
    assert!(m.effective_diffusion_coefficient().is_none());
    let dc = m.diffusion_coefficient().unwrap();
    assert!(dc.iter().flatten().all(|v| v == &vec![DIFFUSION, DIFFUSION]));
}

#[test]
fn test_shared_dof_keeps_last_element() {
    let mut m = module(true, false, false, true);
    m.alloc(3);
    let first = ConstIq {
        tortuosity: 0.1,
        ..ConstIq::default()
    };
    let second = ConstIq {
        tortuosity: 0.2,
        ..ConstIq::default()
    };
    process(&mut m, &StubElement::uniform(&[0, 1], first));
    process(&mut m, &StubElement::uniform(&[1, 2], second));

    assert_eq!(m.tortuosity().unwrap()[0], vec![0.1, 0.2, 0.2]);
}

#[test]
fn test_non_capable_writer_gets_no_commits() {
    let mut m = module(true, true, true, true);
    m.alloc(2);
    process(&mut m, &StubElement::uniform(&[0, 1], ConstIq::default()));

    let mut writer = SummaryWriter::default();
    commit(&m, &mut writer);
    assert_eq!(writer.steps, 0);
    // 缓冲区保持不变
    assert_eq!(m.tortuosity().unwrap()[0], vec![TORTUOSITY, TORTUOSITY]);
}

#[test]
fn test_one_commit_per_enabled_quantity() {
    for bits in 0..8u8 {
        let (t, d, e) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let mut m = module(t, d, e, true);
        m.alloc(2);
        process(&mut m, &StubElement::uniform(&[0, 1], ConstIq::default()));

        let mut writer = RecordingWriter::default();
        commit(&m, &mut writer);

        let names: Vec<&str> = writer.commits.iter().map(Commit::name).collect();
        let mut expected = Vec::new();
        if t {
            expected.push("tortuosity");
        }
        if d {
            expected.push("diffusionCoefficient");
        }
        if e {
            expected.push("effectiveDiffusionCoefficient");
        }
        assert_eq!(names, expected, "bits={bits:03b}");
    }
}

#[test]
fn test_committed_buffers_carry_values() {
    let mut m = module(true, false, true, true);
    m.alloc(2);
    process(&mut m, &StubElement::uniform(&[0, 1], ConstIq::default()));

    let mut writer = RecordingWriter::default();
    commit(&m, &mut writer);
    assert_eq!(
        writer.commits[0],
        Commit::Phase("tortuosity".into(), vec![vec![TORTUOSITY; 2]; 2])
    );
    assert_eq!(
        writer.commits[1],
        Commit::PhaseComponent(
            "effectiveDiffusionCoefficient".into(),
            vec![vec![vec![EFFECTIVE; 2]; 2]; 2]
        )
    );
}

#[test]
fn test_realloc_resizes_and_clears() {
    let mut m = module(true, true, false, true);
    m.alloc(2);
    process(&mut m, &StubElement::uniform(&[0, 1], ConstIq::default()));
    assert_eq!(m.num_dof(), 2);

    m.alloc(6);
    assert_eq!(m.num_dof(), 6);
    assert!(m.tortuosity().unwrap().iter().all(|v| v == &vec![0.0; 6]));
    assert!(m
        .diffusion_coefficient()
        .unwrap()
        .iter()
        .flatten()
        .all(|v| v == &vec![0.0; 6]));

    process(&mut m, &StubElement::uniform(&[5], ConstIq::default()));
    assert_eq!(m.tortuosity().unwrap()[1][5], TORTUOSITY);
}

#[test]
fn test_single_phase_single_component() {
    let reg = registry(true, true, true, true);
    let mut m = VtkDiffusionModule::<f64>::new(mh_diagnostics::FluidLayout::new(1, 1), reg);
    m.alloc(1);
    process(&mut m, &StubElement::uniform(&[0], ConstIq::default()));
    assert_eq!(m.tortuosity().unwrap(), &vec![vec![TORTUOSITY]]);
    assert_eq!(m.diffusion_coefficient().unwrap(), &vec![vec![vec![DIFFUSION]]]);
    assert_eq!(
        m.effective_diffusion_coefficient().unwrap(),
        &vec![vec![vec![EFFECTIVE]]]
    );
}

#[test]
fn test_single_phase_single_component_mixed_flags() {
    let reg = registry(true, false, true, true);
    let mut m = VtkDiffusionModule::<f64>::new(mh_diagnostics::FluidLayout::new(1, 1), reg);
    m.alloc(2);
    process(&mut m, &StubElement::uniform(&[1], ConstIq::default()));
    assert_eq!(m.tortuosity().unwrap(), &vec![vec![0.0, TORTUOSITY]]);
    assert!(m.diffusion_coefficient().is_none());
    assert_eq!(
        m.effective_diffusion_coefficient().unwrap(),
        &vec![vec![vec![0.0, EFFECTIVE]]]
    );
}

#[test]
fn test_missing_registration_falls_back_to_defaults() {
    let reg = std::sync::Arc::new(mh_config::ParameterRegistry::new());
    let mut m = VtkDiffusionModule::<f64>::new(LAYOUT, reg);
    m.alloc(2);
    assert!(m.tortuosity().is_none());
    assert!(m.diffusion_coefficient().is_none());
    assert!(m.effective_diffusion_coefficient().is_none());
}
