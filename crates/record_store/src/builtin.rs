use shared::domain::{DatasetRecord, RecordId, ReproStatus};

pub(crate) fn records() -> Vec<DatasetRecord> {
    vec![
        DatasetRecord {
            id: RecordId(1),
            title: "人类大脑皮层单细胞转录组分析".into(),
            author: "Zhang et al.".into(),
            year: 2024,
            doi: "10.1038/s41586-024-xxxxx".into(),
            species: "人类".into(),
            platform: "10X Genomics".into(),
            samples: 12,
            cells: 45_000,
            status: ReproStatus::Reproduced,
            journal: "Nature".into(),
            publish_date: "2024-01-15".into(),
            citation_count: 156,
            data_link: "https://example.com/data1".into(),
            code_link: "https://github.com/example/repo1".into(),
            env_requirements: "R 4.0+, Seurat 4.0+".into(),
            repro_time_hours: 2.5,
            description: "本研究分析了人类大脑皮层不同区域的单细胞转录组数据，揭示了细胞类型特异性表达模式。".into(),
        },
        DatasetRecord {
            id: RecordId(2),
            title: "小鼠肝脏发育过程中的细胞分化".into(),
            author: "Li et al.".into(),
            year: 2023,
            doi: "10.1016/j.cell.2023.xxxxx".into(),
            species: "小鼠".into(),
            platform: "Smart-seq2".into(),
            samples: 8,
            cells: 28_000,
            status: ReproStatus::InProgress,
            journal: "Cell".into(),
            publish_date: "2023-11-20".into(),
            citation_count: 89,
            data_link: "https://example.com/data2".into(),
            code_link: "https://github.com/example/repo2".into(),
            env_requirements: "Python 3.8+, Scanpy 1.8+".into(),
            repro_time_hours: 4.0,
            description: "通过单细胞RNA测序技术研究小鼠肝脏发育过程中的细胞分化轨迹。".into(),
        },
        DatasetRecord {
            id: RecordId(3),
            title: "果蝇胚胎发育的时空转录组图谱".into(),
            author: "Wang et al.".into(),
            year: 2023,
            doi: "10.1126/science.2023.xxxxx".into(),
            species: "果蝇".into(),
            platform: "Drop-seq".into(),
            samples: 15,
            cells: 32_000,
            status: ReproStatus::NotReproduced,
            journal: "Science".into(),
            publish_date: "2023-09-10".into(),
            citation_count: 234,
            data_link: "https://example.com/data3".into(),
            code_link: String::new(),
            env_requirements: "R 4.1+, Monocle3".into(),
            repro_time_hours: 6.0,
            description: "构建了果蝇胚胎发育的完整时空转录组图谱，揭示了发育过程中的基因表达动态。".into(),
        },
        DatasetRecord {
            id: RecordId(4),
            title: "斑马鱼心脏再生的单细胞分析".into(),
            author: "Chen et al.".into(),
            year: 2024,
            doi: "10.1038/nm.2024.xxxxx".into(),
            species: "斑马鱼".into(),
            platform: "10X Genomics".into(),
            samples: 6,
            cells: 18_000,
            status: ReproStatus::Reproduced,
            journal: "Nature Medicine".into(),
            publish_date: "2024-02-05".into(),
            citation_count: 67,
            data_link: "https://example.com/data4".into(),
            code_link: "https://github.com/example/repo4".into(),
            env_requirements: "R 4.2+, Seurat 5.0+".into(),
            repro_time_hours: 3.5,
            description: "研究斑马鱼心脏再生过程中的细胞类型变化和基因表达模式。".into(),
        },
        DatasetRecord {
            id: RecordId(5),
            title: "拟南芥根尖分生组织的单细胞转录组".into(),
            author: "Liu et al.".into(),
            year: 2023,
            doi: "10.1016/j.devcel.2023.xxxxx".into(),
            species: "拟南芥".into(),
            platform: "CEL-seq2".into(),
            samples: 10,
            cells: 22_000,
            status: ReproStatus::InProgress,
            journal: "Developmental Cell".into(),
            publish_date: "2023-12-15".into(),
            citation_count: 45,
            data_link: "https://example.com/data5".into(),
            code_link: "https://github.com/example/repo5".into(),
            env_requirements: "Python 3.9+, Scanpy 1.9+".into(),
            repro_time_hours: 5.0,
            description: "分析拟南芥根尖分生组织中不同细胞类型的转录组特征。".into(),
        },
    ]
}
